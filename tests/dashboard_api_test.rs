// ==========================================
// 看板/报表 API 集成测试
// ==========================================
// 测试目标: 日汇总窗口、机台今昨对比、低效率告警、过滤报表
// 环境: tempfile 临时 SQLite 数据库，经 AppState 完整装配
// ==========================================

use std::error::Error;
use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use loom_efficiency::app::AppState;
use loom_efficiency::domain::record::NewEfficiencyRecord;
use loom_efficiency::domain::settings::Settings;
use loom_efficiency::domain::types::Shift;
use loom_efficiency::importer::{normalize_extracted, ExtractedRecordFields, RecordExtractor};
use loom_efficiency::api::SUMMARY_CARD_DAYS;
use loom_efficiency::repository::RecordFilter;
use loom_efficiency::ApiError;

// ==========================================
// 测试辅助
// ==========================================

fn create_test_state() -> (TempDir, AppState) {
    let dir = TempDir::new().expect("创建临时目录失败");
    let db_path = dir.path().join("test.db").to_string_lossy().to_string();
    let state = AppState::new(db_path).expect("初始化AppState失败");
    (dir, state)
}

fn seed_record(
    state: &AppState,
    machine: &str,
    date: NaiveDate,
    shift: Shift,
    total_time: &str,
    run_time: &str,
    weft: f64,
) {
    state
        .record_api
        .create_record(NewEfficiencyRecord {
            date,
            entry_time: "08:30".to_string(),
            shift,
            machine_number: machine.to_string(),
            weft_meter: weft,
            stops: 1,
            total_time: total_time.to_string(),
            run_time: run_time.to_string(),
        })
        .expect("预置记录失败");
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

// ==========================================
// 测试用例 1: 日汇总窗口（恒为 N 条、缺数据补零、加权口径）
// ==========================================
#[test]
fn test_daily_summaries_window() {
    let (_dir, state) = create_test_state();

    // 3/20 两条记录: 合计 20h/17h => 85%（加权，而非百分比平均）
    seed_record(&state, "1", d(20), Shift::Day, "10:00", "09:00", 100.0);
    seed_record(&state, "2", d(20), Shift::Day, "10:00", "08:00", 80.0);
    seed_record(&state, "1", d(22), Shift::Day, "10:00", "05:00", 40.0);

    let summaries = state
        .dashboard_api
        .daily_summaries(d(22), SUMMARY_CARD_DAYS)
        .unwrap();
    assert_eq!(summaries.len(), SUMMARY_CARD_DAYS as usize);
    // 新日期在前
    assert_eq!(summaries[0].date, d(22));
    assert_eq!(summaries[8].date, d(14));

    let day20 = summaries.iter().find(|s| s.date == d(20)).unwrap();
    assert_eq!(day20.record_count, 2);
    assert!((day20.total_weft - 180.0).abs() < 1e-9);
    assert!((day20.efficiency_pct - 85.0).abs() < 1e-9);

    // 无数据日期补零
    let day21 = summaries.iter().find(|s| s.date == d(21)).unwrap();
    assert_eq!(day21.record_count, 0);
    assert_eq!(day21.total_weft, 0.0);
    assert_eq!(day21.efficiency_pct, 0.0);

    // 窗口天数为 0 非法
    let err = state.dashboard_api.daily_summaries(d(22), 0).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

// ==========================================
// 测试用例 2: 机台今昨对比（花名册取自设置，无记录机台全零）
// ==========================================
#[test]
fn test_machine_comparison_uses_roster() {
    let (_dir, state) = create_test_state();

    // 未配置机台总数 => 花名册为空 => 空列表
    assert!(state.dashboard_api.machine_comparison(d(20)).unwrap().is_empty());

    state
        .settings_repo
        .save(&Settings {
            total_machines: Some(3),
            low_efficiency_threshold: None,
            notify_number: None,
            notify_template: None,
        })
        .unwrap();

    seed_record(&state, "2", d(20), Shift::Day, "10:00", "09:00", 90.0);
    seed_record(&state, "2", d(19), Shift::Day, "10:00", "08:00", 70.0);

    let comparison = state.dashboard_api.machine_comparison(d(20)).unwrap();
    assert_eq!(comparison.len(), 3);
    // 数值升序花名册
    let machines: Vec<&str> = comparison.iter().map(|c| c.machine_number.as_str()).collect();
    assert_eq!(machines, vec!["1", "2", "3"]);

    let m2 = &comparison[1];
    assert!((m2.today_weft - 90.0).abs() < 1e-9);
    assert!((m2.yesterday_weft - 70.0).abs() < 1e-9);
    assert!((m2.today_efficiency - 90.0).abs() < 1e-9);
    assert!((m2.yesterday_efficiency - 80.0).abs() < 1e-9);

    // 花名册里无记录的机台全零
    let m1 = &comparison[0];
    assert_eq!(m1.today_weft, 0.0);
    assert_eq!(m1.today_efficiency, 0.0);
}

// ==========================================
// 测试用例 3: 低效率告警（阈值来源、0% 视为无数据、效率升序）
// ==========================================
#[test]
fn test_low_efficiency_alert() {
    let (_dir, state) = create_test_state();

    // 回溯窗口内: 机台 1 为 90%，机台 2 为 70%，机台 3 为 60%
    seed_record(&state, "1", d(20), Shift::Day, "10:00", "09:00", 90.0);
    seed_record(&state, "2", d(19), Shift::Day, "10:00", "07:00", 70.0);
    seed_record(&state, "3", d(20), Shift::Night, "10:00", "06:00", 60.0);
    // 0% 记录: 有数据但 run=0，视为无数据不告警
    seed_record(&state, "4", d(20), Shift::Day, "10:00", "00:00", 0.0);
    // 回溯窗口外的低效记录不参与
    seed_record(&state, "5", d(10), Shift::Day, "10:00", "01:00", 5.0);

    // 设置缺失 => 默认阈值 80
    let alert = state.dashboard_api.low_efficiency_alert(d(20)).unwrap();
    assert_eq!(alert.threshold_pct, 80);
    assert!(alert.notify_number.is_none());
    let machines: Vec<&str> = alert.machines.iter().map(|m| m.machine_number.as_str()).collect();
    // 效率升序（最差在前）
    assert_eq!(machines, vec!["3", "2"]);
    assert!((alert.machines[0].efficiency_pct - 60.0).abs() < 1e-9);

    // 调低阈值后机台 2 不再告警
    state
        .settings_repo
        .save(&Settings {
            total_machines: Some(5),
            low_efficiency_threshold: Some(65),
            notify_number: Some("13800000000".to_string()),
            notify_template: None,
        })
        .unwrap();
    let alert = state.dashboard_api.low_efficiency_alert(d(20)).unwrap();
    assert_eq!(alert.threshold_pct, 65);
    assert_eq!(alert.notify_number.as_deref(), Some("13800000000"));
    assert_eq!(alert.machines.len(), 1);
    assert_eq!(alert.machines[0].machine_number, "3");
}

// ==========================================
// 测试用例 4: 过滤报表（日期降序分组 + 组内合计 + 机台下拉）
// ==========================================
#[test]
fn test_date_range_report() {
    let (_dir, state) = create_test_state();

    seed_record(&state, "1", d(10), Shift::Day, "10:00", "09:00", 100.0);
    seed_record(&state, "2", d(10), Shift::Night, "10:00", "08:00", 80.0);
    seed_record(&state, "10", d(12), Shift::Day, "10:00", "09:00", 110.0);

    let groups = state
        .report_api
        .date_range_report(&RecordFilter {
            date_from: Some(d(9)),
            date_to: Some(d(12)),
            machine_number: None,
            shift: None,
        })
        .unwrap();

    // 日期降序，仅有记录的日期成组
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].date, d(12));
    assert_eq!(groups[1].date, d(10));
    assert_eq!(groups[1].records.len(), 2);
    assert!((groups[1].total_weft - 180.0).abs() < 1e-9);

    // 机台过滤
    let only_m2 = state
        .report_api
        .date_range_report(&RecordFilter {
            machine_number: Some("2".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(only_m2.len(), 1);
    assert_eq!(only_m2[0].records.len(), 1);
    assert_eq!(only_m2[0].records[0].record.machine_number, "2");

    // 班次过滤
    let only_night = state
        .report_api
        .date_range_report(&RecordFilter {
            shift: Some(Shift::Night),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(only_night.len(), 1);
    assert_eq!(only_night[0].date, d(10));

    // 区间颠倒非法
    let err = state
        .report_api
        .date_range_report(&RecordFilter {
            date_from: Some(d(12)),
            date_to: Some(d(10)),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    // 机台下拉: 出现过记录的机台号，数值升序
    let machines = state.report_api.machine_numbers().unwrap();
    assert_eq!(machines, vec!["1", "2", "10"]);
}

// ==========================================
// 测试用例 5: 识别接口 -> 归一化 -> 录入 全链路
// ==========================================

/// 返回固定读数的识别服务桩
struct FixedExtractor;

#[async_trait::async_trait]
impl RecordExtractor for FixedExtractor {
    async fn extract(
        &self,
        _photo_data_uri: &str,
    ) -> Result<ExtractedRecordFields, Box<dyn Error + Send + Sync>> {
        Ok(ExtractedRecordFields {
            machine_number: " 8 ".to_string(),
            weft_meter: 96.5,
            stops: 3,
            total_time: "10:0".to_string(),
            run_time: "9:30".to_string(),
            entry_time: Some("8:5".to_string()),
        })
    }
}

#[tokio::test]
async fn test_extract_then_create_record() {
    let (_dir, state) = create_test_state();

    let extractor = Arc::new(FixedExtractor) as Arc<dyn RecordExtractor>;
    let raw = extractor
        .extract("data:image/jpeg;base64,AAAA")
        .await
        .expect("识别应成功");
    let fields = normalize_extracted(raw);

    assert_eq!(fields.machine_number, "8");
    assert_eq!(fields.total_time, "10:00");
    assert_eq!(fields.run_time, "09:30");

    let computed = state
        .record_api
        .create_record(NewEfficiencyRecord {
            date: d(20),
            entry_time: fields.entry_time.unwrap_or_else(|| "00:00".to_string()),
            shift: Shift::Day,
            machine_number: fields.machine_number,
            weft_meter: fields.weft_meter,
            stops: fields.stops,
            total_time: fields.total_time,
            run_time: fields.run_time,
        })
        .expect("识别结果录入应成功");

    assert_eq!(computed.record.entry_time, "08:05");
    assert!((computed.metrics.efficiency_pct - 95.0).abs() < 1e-9);
}
