// ==========================================
// 织机班次效率跟踪系统 - 领域类型定义
// ==========================================
// 班次: 白班(Day) / 夜班(Night)，一台织机每天每班最多一条记录
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 班次 (Shift)
// ==========================================
// 序列化格式: "Day" / "Night" (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    Day,   // 白班
    Night, // 夜班
}

impl Shift {
    /// 转换为数据库存储字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Day => "Day",
            Shift::Night => "Night",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Day" => Ok(Shift::Day),
            "Night" => Ok(Shift::Night),
            other => Err(format!("未知班次: {}", other)),
        }
    }
}

// ==========================================
// 排序方向 (SortDirection)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// 取反方向（同一列重复点击时翻转）
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}
