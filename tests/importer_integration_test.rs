// ==========================================
// PriceBookImporter 集成测试
// ==========================================
// 测试目标: 验证完整的价格手册导入流程
// ==========================================


use global_pricebook::api::ImportApi;
use global_pricebook::engine::PriceBookAuditor;
use global_pricebook::importer::{
    PriceBookImporter, PriceBookImporterImpl, UniversalSheetParser,
};
use global_pricebook::logging;
use global_pricebook::repository::{
    PriceBookRepository, PriceBookRepositoryImpl, TermsRepository, TermsRepositoryImpl,
};
use test_helpers::{build_canonical_matrix, create_test_db, write_matrix_csv, EXPECTED_ENTRIES};

/// 创建测试用的 PriceBookImporter 实例
fn create_test_importer(
    db_path: &str,
) -> PriceBookImporterImpl<PriceBookRepositoryImpl, TermsRepositoryImpl> {
    let price_book_repo =
        PriceBookRepositoryImpl::new(db_path).expect("Failed to create PriceBookRepository");
    let terms_repo = TermsRepositoryImpl::new(db_path).expect("Failed to create TermsRepository");

    PriceBookImporterImpl::new(
        price_book_repo,
        terms_repo,
        Box::new(UniversalSheetParser),
        PriceBookAuditor::default(),
    )
}

#[tokio::test]
async fn test_import_canonical_csv() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    let csv_file = write_matrix_csv(&build_canonical_matrix(0)).expect("Failed to write fixture");

    let importer = create_test_importer(&db_path);
    let summary = importer
        .import_from_file(csv_file.path())
        .await
        .expect("Import should succeed");

    assert_eq!(summary.data_rows, 7, "7 个国家数据行");
    assert_eq!(summary.entries, EXPECTED_ENTRIES);
    // 未定价组合: 6 国缺 L4/L5 各 2, Brazil 另缺派单 L3
    assert_eq!(summary.skipped_cells, 13);
    assert!(summary.layout_drifts.is_empty(), "规范表不应有布局漂移");
    assert!(
        summary.report.is_clean(),
        "规范表审计应为零发现: {:?}",
        summary.report.issues
    );

    // 验证数据落库
    let conn = rusqlite::Connection::open(&db_path).expect("Failed to open db");
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM price_book", [], |row| row.get(0))
        .expect("Failed to count entries");
    assert_eq!(count as usize, EXPECTED_ENTRIES);

    // 锚点条目抽查
    let base_rate: f64 = conn
        .query_row(
            "SELECT base_rate FROM price_book \
             WHERE country = 'India' AND level = 'L1' AND service_type = 'Full Day Visit (8hrs)'",
            [],
            |row| row.get(0),
        )
        .expect("India L1 entry should exist");
    assert_eq!(base_rate, 5995.0); // "US$5,995" 解析结果

    // 供应商缺省
    let supplier: String = conn
        .query_row("SELECT DISTINCT supplier FROM price_book", [], |row| {
            row.get(0)
        })
        .expect("Failed to read supplier");
    assert_eq!(supplier, "Direct");
}

#[tokio::test]
async fn test_import_never_emits_unpriced_combination() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    let csv_file = write_matrix_csv(&build_canonical_matrix(0)).expect("Failed to write fixture");

    let importer = create_test_importer(&db_path);
    importer
        .import_from_file(csv_file.path())
        .await
        .expect("Import should succeed");

    // Brazil 派单 L3 留空 → 不存在条目 (而非零价条目)
    let conn = rusqlite::Connection::open(&db_path).expect("Failed to open db");
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM price_book \
             WHERE country = 'Brazil' AND level = 'L3' AND service_type = 'Dispatch Ticket'",
            [],
            |row| row.get(0),
        )
        .expect("Failed to count");
    assert_eq!(count, 0);

    // SLA 档 N/A → NULL (而非 0)
    let sbd: Option<f64> = conn
        .query_row(
            "SELECT rate_sbd FROM price_book WHERE country = 'Australia' LIMIT 1",
            [],
            |row| row.get(0),
        )
        .expect("Failed to read rate_sbd");
    assert_eq!(sbd, None);
}

#[tokio::test]
async fn test_reimport_replaces_not_accumulates() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    let csv_file = write_matrix_csv(&build_canonical_matrix(0)).expect("Failed to write fixture");

    let importer = create_test_importer(&db_path);
    let first = importer
        .import_from_file(csv_file.path())
        .await
        .expect("First import should succeed");
    let second = importer
        .import_from_file(csv_file.path())
        .await
        .expect("Second import should succeed");

    // 整批替换: 两次导入后总量不翻倍
    let repo = PriceBookRepositoryImpl::new(&db_path).expect("Failed to create repo");
    assert_eq!(repo.count().await.expect("count"), EXPECTED_ENTRIES);

    // 幂等性: 两次提取的条目序列 (按内容键) 一致
    assert_eq!(first.entries, second.entries);
    let entries = repo.list_all().await.expect("list_all");
    let batch_ids: std::collections::BTreeSet<&str> =
        entries.iter().map(|e| e.batch_id.as_str()).collect();
    assert_eq!(batch_ids.len(), 1, "只保留最后一个批次");
    assert_eq!(batch_ids.iter().next(), Some(&second.batch_id.as_str()));
}

#[tokio::test]
async fn test_import_follows_layout_drift() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    // 整表右移两列: 启发式应跟随, 且漂移被显式报告
    let csv_file = write_matrix_csv(&build_canonical_matrix(2)).expect("Failed to write fixture");

    let importer = create_test_importer(&db_path);
    let summary = importer
        .import_from_file(csv_file.path())
        .await
        .expect("Import should succeed");

    assert_eq!(summary.entries, EXPECTED_ENTRIES, "漂移表仍完整提取");
    assert!(
        !summary.layout_drifts.is_empty(),
        "漂移必须被报告而非静默吸收"
    );
    assert!(summary
        .layout_drifts
        .iter()
        .any(|d| d.field == "identity.region" && d.heuristic_col == 2 && d.fallback_col == 0));
    assert!(
        summary.report.is_clean(),
        "内容未变, 审计应为零发现: {:?}",
        summary.report.issues
    );
}

#[tokio::test]
async fn test_import_seeds_default_terms_once() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    let csv_file = write_matrix_csv(&build_canonical_matrix(0)).expect("Failed to write fixture");

    // 预先写入自定义条款: 导入不得覆盖
    let terms_repo = TermsRepositoryImpl::new(&db_path).expect("Failed to create terms repo");
    let custom = global_pricebook::TermsConditions {
        service_management_fee_pct: 8.0,
        ..Default::default()
    };
    terms_repo.upsert_singleton(&custom).await.expect("upsert");

    let importer = create_test_importer(&db_path);
    importer
        .import_from_file(csv_file.path())
        .await
        .expect("Import should succeed");

    let terms = terms_repo
        .find_singleton()
        .await
        .expect("find_singleton")
        .expect("terms should exist");
    assert_eq!(terms.service_management_fee_pct, 8.0, "已有条款不被播种覆盖");
}

#[tokio::test]
async fn test_import_records_batch_and_audit_via_api() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    let csv_file = write_matrix_csv(&build_canonical_matrix(0)).expect("Failed to write fixture");

    let api = ImportApi::new(
        create_test_importer(&db_path),
        PriceBookRepositoryImpl::new(&db_path).expect("repo"),
        PriceBookAuditor::default(),
    );

    // 空库审计: 总数 0 且至少一条结构性发现
    let empty_report = api.audit_price_book().await.expect("audit");
    assert_eq!(empty_report.total_entries, 0);
    assert!(empty_report.issue_count >= 1);

    let summary = api
        .import_price_book(csv_file.path())
        .await
        .expect("Import should succeed");

    // 批次记录可回读
    let batches = api.recent_batches(5).await.expect("recent_batches");
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].batch_id, summary.batch_id);
    assert_eq!(batches[0].entries, EXPECTED_ENTRIES);

    // 导入后审计: 零发现
    let report = api.audit_price_book().await.expect("audit");
    assert_eq!(report.total_entries, EXPECTED_ENTRIES);
    assert!(report.is_clean(), "issues: {:?}", report.issues);
}

#[tokio::test]
async fn test_import_missing_file_fails_whole_batch() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let result = importer.import_from_file("does_not_exist.csv").await;
    assert!(result.is_err());

    // 失败的导入不留下任何半成品
    let repo = PriceBookRepositoryImpl::new(&db_path).expect("repo");
    assert_eq!(repo.count().await.expect("count"), 0);
}
