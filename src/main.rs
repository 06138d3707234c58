// ==========================================
// 全球服务价格手册与报价系统 - 命令行入口
// ==========================================
// 子命令:
//   import <file>                         导入价格表 (.xlsx/.xls/.csv)
//   audit                                 审计当前价格手册
//   regions                               列出区域
//   countries <region>                    列出区域内国家
//   quote <country> <level> <service_type> [distance] [--ooh] [--weekend] [--supplier <s>]
// 环境变量:
//   PRICEBOOK_DB: 数据库路径 (缺省为平台数据目录)
// ==========================================

use global_pricebook::api::{ImportApi, QuoteApi, QuoteParams};
use global_pricebook::db;
use global_pricebook::engine::PriceBookAuditor;
use global_pricebook::importer::{PriceBookImporterImpl, UniversalSheetParser};
use global_pricebook::logging;
use global_pricebook::repository::{PriceBookRepositoryImpl, TermsRepositoryImpl};

fn db_path() -> String {
    std::env::var("PRICEBOOK_DB").unwrap_or_else(|_| db::default_db_path())
}

fn usage() -> ! {
    eprintln!("用法:");
    eprintln!("  global-pricebook import <file>");
    eprintln!("  global-pricebook audit");
    eprintln!("  global-pricebook regions");
    eprintln!("  global-pricebook countries <region>");
    eprintln!(
        "  global-pricebook quote <country> <level> <service_type> [distance] [--ooh] [--weekend] [--supplier <s>]"
    );
    std::process::exit(2);
}

fn quote_api(path: &str) -> anyhow::Result<QuoteApi<PriceBookRepositoryImpl, TermsRepositoryImpl>> {
    Ok(QuoteApi::new(
        PriceBookRepositoryImpl::new(path)?,
        TermsRepositoryImpl::new(path)?,
    ))
}

fn import_api(
    path: &str,
) -> anyhow::Result<
    ImportApi<
        PriceBookImporterImpl<PriceBookRepositoryImpl, TermsRepositoryImpl>,
        PriceBookRepositoryImpl,
    >,
> {
    let importer = PriceBookImporterImpl::new(
        PriceBookRepositoryImpl::new(path)?,
        TermsRepositoryImpl::new(path)?,
        Box::new(UniversalSheetParser),
        PriceBookAuditor::default(),
    );
    Ok(ImportApi::new(
        importer,
        PriceBookRepositoryImpl::new(path)?,
        PriceBookAuditor::default(),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", global_pricebook::APP_NAME, global_pricebook::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = db_path();
    tracing::info!("使用数据库: {}", path);

    match args.first().map(|s| s.as_str()) {
        Some("import") => {
            let Some(file) = args.get(1) else { usage() };
            let summary = import_api(&path)?.import_price_book(file).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Some("audit") => {
            let report = import_api(&path)?.audit_price_book().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some("regions") => {
            let api = quote_api(&path)?;
            for region in api.list_regions().await? {
                println!("{}", region);
            }
        }
        Some("countries") => {
            let Some(region) = args.get(1) else { usage() };
            let api = quote_api(&path)?;
            for country in api.list_countries(region).await? {
                println!("{}", country);
            }
        }
        Some("quote") => {
            let (Some(country), Some(level), Some(service_type)) =
                (args.get(1), args.get(2), args.get(3))
            else {
                usage()
            };

            let mut params = QuoteParams {
                country: country.clone(),
                level: level.clone(),
                service_type: service_type.clone(),
                ..Default::default()
            };

            let mut rest = args[4..].iter();
            while let Some(arg) = rest.next() {
                match arg.as_str() {
                    "--ooh" => params.out_of_hours = true,
                    "--weekend" => params.weekend = true,
                    "--supplier" => {
                        let Some(supplier) = rest.next() else { usage() };
                        params.supplier = Some(supplier.clone());
                    }
                    value => {
                        let Ok(distance) = value.parse::<f64>() else {
                            usage()
                        };
                        params.distance = distance;
                    }
                }
            }

            let api = quote_api(&path)?;
            let result = api.calculate_quote(params).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => usage(),
    }

    Ok(())
}
