// ==========================================
// 织机班次效率跟踪系统 - SQL 构建工具
// ==========================================
// 职责: 报表等动态过滤查询的 SQL 拼装
// 说明: 只拼 SQL 文本，参数仍走占位符绑定
// ==========================================

/// 动态 SQL 查询构建器
///
/// 过滤条件全部是"有值才加子句"的可选项，所以只提供 and_if；
/// 每个加进来的子句必须自带 `?` 占位符，值走绑定
pub struct SqlQueryBuilder {
    select_clause: String,
    where_clauses: Vec<String>,
    order_by_clause: Option<String>,
}

impl SqlQueryBuilder {
    /// 创建新的 SQL 查询构建器
    pub fn new(select: &str) -> Self {
        Self {
            select_clause: select.to_string(),
            where_clauses: Vec::new(),
            order_by_clause: None,
        }
    }

    /// 条件添加 AND 子句（None 时跳过）
    pub fn and_if(mut self, condition: Option<&str>) -> Self {
        if let Some(cond) = condition {
            self.where_clauses.push(cond.to_string());
        }
        self
    }

    /// 添加 ORDER BY 子句
    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by_clause = Some(order.to_string());
        self
    }

    /// 构建最终的 SQL 语句
    pub fn build(&self) -> String {
        let mut sql = self.select_clause.clone();

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(order) = &self.order_by_clause {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_plain_select() {
        let sql = SqlQueryBuilder::new("SELECT * FROM efficiency_records").build();
        assert_eq!(sql, "SELECT * FROM efficiency_records");
    }

    #[test]
    fn test_build_with_filters_and_order() {
        let sql = SqlQueryBuilder::new("SELECT * FROM efficiency_records")
            .and_if(Some("date >= ?"))
            .and_if(Some("machine_number = ?"))
            .and_if(None)
            .order_by("date DESC")
            .build();
        assert_eq!(
            sql,
            "SELECT * FROM efficiency_records WHERE date >= ? AND machine_number = ? ORDER BY date DESC"
        );
    }

    #[test]
    fn test_all_none_builds_unfiltered() {
        let sql = SqlQueryBuilder::new("SELECT machine_number FROM efficiency_records")
            .and_if(None)
            .and_if(None)
            .order_by("machine_number")
            .build();
        assert_eq!(
            sql,
            "SELECT machine_number FROM efficiency_records ORDER BY machine_number"
        );
    }
}
