// ==========================================
// 织机班次效率跟踪系统 - 外部数据接入层
// ==========================================
// 职责: 照片识别接口（外部识别服务的接入点）
// ==========================================

pub mod record_extractor;

pub use record_extractor::{
    normalize_extracted, normalize_time_field, ExtractedRecordFields, RecordExtractor,
};
