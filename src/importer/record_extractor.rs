// ==========================================
// 织机班次效率跟踪系统 - 读数识别接口
// ==========================================
// 职责: 定义"机台显示屏照片 -> 结构化读数"的识别接口（不含实现）
// 说明: 识别服务是外部协作方（远程模型调用），核心只约定接口
//       与识别结果落入表单前的纯归一化处理
// ==========================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;

// ==========================================
// ExtractedRecordFields - 识别结果
// ==========================================
/// 识别服务从照片中抽取的字段，用于预填录入表单
///
/// 识别输出不可信: 入库前仍要走录入校验（查重、run<=total）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecordFields {
    /// 机台号（铭牌或屏显）
    pub machine_number: String,
    /// 纬纱产量读数（米）
    pub weft_meter: f64,
    /// 停台次数读数
    pub stops: i64,
    /// "Total Time" 读数，期望 HH:MM
    pub total_time: String,
    /// "Run time len" 读数，期望 HH:MM
    pub run_time: String,
    /// 屏显时刻（可缺失）
    pub entry_time: Option<String>,
}

// ==========================================
// RecordExtractor Trait
// ==========================================
// 用途: 照片识别主接口
// 实现者: 外部识别服务适配器（不在核心范围内）
#[async_trait]
pub trait RecordExtractor: Send + Sync {
    /// 从机台显示屏照片中识别读数
    ///
    /// # 参数
    /// - photo_data_uri: data URI 形式的照片（data:<mimetype>;base64,...）
    ///
    /// # 返回
    /// - Ok(ExtractedRecordFields): 识别出的读数字段
    /// - Err: 识别服务调用失败
    async fn extract(
        &self,
        photo_data_uri: &str,
    ) -> Result<ExtractedRecordFields, Box<dyn Error + Send + Sync>>;
}

// ==========================================
// 识别结果归一化
// ==========================================

/// 时刻/时长字符串归一化为零填充的 "HH:MM"
///
/// 识别输出常见 "7:5"、带秒等变体；无法归一化时回退 "00:00"
/// （与时长解析同样软降级，绝不报错）。
///
/// 分钟分量 >= 60 按误读整体回退 "00:00"，不做进位也不原样保留——
/// 这里比单纯补零更严: "07:99" 一旦透传，解析层会把它算成
/// 7 小时 99 分，污染之后的全部指标
pub fn normalize_time_field(raw: &str) -> String {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() < 2 {
        return "00:00".to_string();
    }
    match (
        parts[0].trim().parse::<u32>(),
        parts[1].trim().parse::<u32>(),
    ) {
        (Ok(h), Ok(m)) if m < 60 => format!("{:02}:{:02}", h, m),
        _ => "00:00".to_string(),
    }
}

/// 识别结果整体归一化（落入表单前调用）
pub fn normalize_extracted(mut fields: ExtractedRecordFields) -> ExtractedRecordFields {
    fields.machine_number = fields.machine_number.trim().to_string();
    fields.total_time = normalize_time_field(&fields.total_time);
    fields.run_time = normalize_time_field(&fields.run_time);
    fields.entry_time = fields.entry_time.map(|t| normalize_time_field(&t));
    if fields.weft_meter < 0.0 || !fields.weft_meter.is_finite() {
        fields.weft_meter = 0.0;
    }
    if fields.stops < 0 {
        fields.stops = 0;
    }
    fields
}
