use bill_splitter::domain::model::BatchReport;
use bill_splitter::utils::{logger, validation::Validate};
use bill_splitter::{
    BillPipeline, CliConfig, LocalStorage, RunOutcome, SplitEngine, SplitError, SplitterConfig,
};
use clap::error::ErrorKind;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match CliConfig::try_parse() {
        Ok(config) => config,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => return report_failure(&SplitError::from(e)),
    };

    // 驗證參數，失敗時不做任何檔案操作
    if let Err(e) = config.validate() {
        return report_failure(&e);
    }

    // 載入設定檔
    let file_config = match SplitterConfig::load(config.config.as_deref()) {
        Ok(file_config) => file_config,
        Err(e) => return report_failure(&e),
    };

    // 初始化日誌
    logger::init_cli_logger(
        config.verbose,
        file_config.log_level(),
        file_config.json_logs(),
    );

    tracing::info!("Starting bill-splitter");
    tracing::debug!("CLI config: {:?}", config);
    tracing::debug!("File config: {:?}", file_config);

    let format = config.resolve_format(file_config.default_format());
    let (input, output) = match (config.input_path(), config.output_path()) {
        (Ok(input), Ok(output)) => (input, output),
        (Err(e), _) | (_, Err(e)) => return report_failure(&e),
    };

    let storage = LocalStorage::default();
    let pipeline = BillPipeline::new(storage.clone(), file_config);
    let engine = SplitEngine::new(storage, pipeline);

    match engine.run(input, output, format).await {
        Ok(RunOutcome::Single { output_path }) => {
            tracing::info!("✅ Bill processed successfully");
            println!("✅ 處理完成！結果已輸出至: {}", output_path.display());
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Batch(report)) => report_batch(&report, output),
        Err(e) => report_failure(&e),
    }
}

fn report_batch(report: &BatchReport, output_dir: &Path) -> ExitCode {
    println!(
        "✅ 批次處理完成：成功 {} 個，失敗 {} 個。結果已輸出至: {}",
        report.succeeded_count(),
        report.failed_count(),
        output_dir.display()
    );

    if report.is_success() {
        return ExitCode::SUCCESS;
    }

    for failure in &report.failed {
        eprintln!("❌ 處理檔案 {} 時發生錯誤: {}", failure.file_name, failure.reason);
    }
    eprintln!("💡 建議: 修正上述檔案後重新執行批次處理");
    ExitCode::FAILURE
}

fn report_failure(e: &SplitError) -> ExitCode {
    tracing::error!(
        "❌ bill-splitter failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ 錯誤: {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    ExitCode::FAILURE
}
