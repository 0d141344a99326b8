//! Standalone price collector CLI.

use clap::{Parser, Subcommand, ValueEnum};
use fuelwatch_data::SqliteStore;
use fuelwatch_notification::{NotificationSender, TelegramSender};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fuelwatch_collector::{modules, CollectorConfig};

#[derive(Parser)]
#[command(name = "fuelwatch-collector")]
#[command(about = "FuelWatch Price Collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

/// 기본 로그 필터 지시문.
///
/// 수집/감지 로그(스크레이퍼 실패 warn, flagged 변동의 alert 라인)는
/// 라이브러리 crate에서 발생하므로, collector만 지정하면 전부
/// 걸러집니다. 워크스페이스 crate를 모두 포함합니다.
fn default_filter_directive(level: &str) -> String {
    format!(
        "fuelwatch_collector={level},fuelwatch_core={level},fuelwatch_data={level},\
         fuelwatch_detect={level},fuelwatch_notification={level}"
    )
}

#[derive(Subcommand)]
enum Commands {
    /// 연료 가격 수집 (gogo.gs 스크레이핑)
    FetchFuel {
        /// 샘플 날짜를 지정 날짜로 대체 (예: "2025-11-06")
        #[arg(long)]
        mock_date: Option<chrono::NaiveDate>,

        /// 스크레이핑 대신 mock 샘플 사용
        #[arg(long)]
        mock: bool,

        /// 수집 후 자동 변동 감지 생략
        #[arg(long)]
        no_detect: bool,
    },

    /// 환율 수집 (exchangerate-api.com)
    FetchExchange {
        /// 실제 API 대신 mock 데이터 사용
        #[arg(long)]
        mock: bool,

        /// 수집 후 자동 변동 감지 생략
        #[arg(long)]
        no_detect: bool,
    },

    /// 연료 가격 + 환율 수집
    FetchAll {
        /// 샘플 날짜를 지정 날짜로 대체
        #[arg(long)]
        mock_date: Option<chrono::NaiveDate>,

        /// 모든 소스에 mock 데이터 사용
        #[arg(long)]
        mock: bool,
    },

    /// 뉴스 수집 및 분석
    FetchNews {
        /// NewsAPI 대신 mock 뉴스 사용
        #[arg(long)]
        mock: bool,

        /// Gemini 대신 mock 분석기 사용
        #[arg(long)]
        mock_analysis: bool,
    },

    /// 변동 감지만 실행
    Detect,

    /// 저장된 데이터 목록 출력
    List {
        /// 출력 대상
        #[arg(value_enum)]
        target: ListTarget,
    },

    /// 가장 최근 데이터 출력
    Latest {
        /// 출력 대상
        #[arg(value_enum)]
        target: LatestTarget,
    },

    /// 최근 연료 가격 변동의 원인 해설 생성
    ExplainChange,

    /// 데몬 모드: 주기적으로 전체 워크플로우 실행
    Daemon,
}

#[derive(Clone, Copy, ValueEnum)]
enum ListTarget {
    Fuel,
    Exchange,
    News,
    Changes,
}

#[derive(Clone, Copy, ValueEnum)]
enum LatestTarget {
    Fuel,
    Exchange,
    News,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter_directive(&cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("FuelWatch Collector 시작");

    // 설정 로드 (CLI 플래그가 환경변수 설정을 덮어씀)
    let mut config = CollectorConfig::from_env()?;
    apply_cli_overrides(&mut config, &cli.command);
    tracing::debug!(db_path = %config.db_path, "설정 로드 완료");

    // 저장소 오픈
    let store = SqliteStore::open(&config.db_path).await?;
    tracing::info!("데이터베이스 오픈 성공");

    // 알림 전송기 (환경변수 없으면 비활성)
    let notifier = TelegramSender::from_env();
    let notifier_ref: Option<&dyn NotificationSender> = notifier
        .as_ref()
        .filter(|sender| sender.is_enabled())
        .map(|sender| sender as &dyn NotificationSender);

    // 명령 실행
    match cli.command {
        Commands::FetchFuel { mock_date, .. } => {
            let price = modules::fetch_fuel_price(&store, &config, mock_date).await?;
            print_fuel_price(&price);
            if config.detect.auto_detect {
                modules::detect_changes(&store, &config, notifier_ref).await?;
            }
        }
        Commands::FetchExchange { .. } => {
            let rate = modules::fetch_exchange_rate(&store, &config).await?;
            print_exchange_rate(&rate);
            if config.detect.auto_detect {
                modules::detect_changes(&store, &config, notifier_ref).await?;
            }
        }
        Commands::FetchAll { mock_date, .. } => {
            tracing::info!("=== 전체 수집 시작 ===");

            tracing::info!("Step 1/3: 연료 가격 수집");
            let price = modules::fetch_fuel_price(&store, &config, mock_date).await?;
            print_fuel_price(&price);

            tracing::info!("Step 2/3: 환율 수집");
            let rate = modules::fetch_exchange_rate(&store, &config).await?;
            print_exchange_rate(&rate);

            tracing::info!("Step 3/3: 변동 감지");
            modules::detect_changes(&store, &config, notifier_ref).await?;

            tracing::info!("=== 전체 수집 완료 ===");
        }
        Commands::FetchNews { .. } => {
            let analyzer = modules::build_analyzer(&config)?;
            let stats = modules::fetch_news(&store, &config, analyzer.as_ref()).await?;
            stats.log_summary("뉴스 수집");
        }
        Commands::Detect => {
            modules::detect_changes(&store, &config, notifier_ref).await?;
        }
        Commands::List { target } => match target {
            ListTarget::Fuel => {
                for price in store.all_fuel_prices().await? {
                    println!(
                        "{} - レギュラー:{:.2}円 ハイオク:{:.2}円 軽油:{:.2}円 ({})",
                        price.date, price.regular, price.premium, price.diesel, price.region
                    );
                }
            }
            ListTarget::Exchange => {
                for rate in store.all_exchange_rates().await? {
                    println!(
                        "{} - USD:{:.2} EUR:{:.2} GBP:{:.2} CNY:{:.2}",
                        rate.date, rate.usd_jpy, rate.eur_jpy, rate.gbp_jpy, rate.cny_jpy
                    );
                }
            }
            ListTarget::News => {
                for news in store.latest_news(100).await? {
                    println!("[{}] {} ({})", news.sentiment, news.title, news.url);
                }
            }
            ListTarget::Changes => {
                for change in store.recent_changes(50).await? {
                    let marker = if change.flagged { "🚨" } else { "  " };
                    println!(
                        "{} {} {}/{} {} → {}: {:.2} → {:.2} ({:+.2}%)",
                        marker,
                        change.series,
                        change.key,
                        change.field,
                        change.date_old,
                        change.date_new,
                        change.price_old,
                        change.price_new,
                        change.pct_change
                    );
                }
            }
        },
        Commands::Latest { target } => match target {
            LatestTarget::Fuel => match store.latest_fuel_price().await? {
                Some(price) => print_fuel_price(&price),
                None => println!("データがありません"),
            },
            LatestTarget::Exchange => match store.latest_exchange_rate().await? {
                Some(rate) => print_exchange_rate(&rate),
                None => println!("データがありません"),
            },
            LatestTarget::News => {
                let news = store.latest_news(5).await?;
                if news.is_empty() {
                    println!("ニュースがありません");
                }
                for item in news {
                    println!("━━━━━━━━━━━━━━━━━━━━━━");
                    println!("{}", item.title);
                    println!("感情: {} / 影響: {}", item.sentiment, item.impact);
                    println!("{}", item.summary);
                    println!("URL: {}", item.url);
                }
            }
        },
        Commands::ExplainChange => {
            explain_latest_change(&store, &config).await?;
        }
        Commands::Daemon => {
            run_daemon(&store, &config, notifier_ref).await;
        }
    }

    tracing::info!("FuelWatch Collector 종료");
    Ok(())
}

/// CLI 플래그를 설정에 반영합니다.
fn apply_cli_overrides(config: &mut CollectorConfig, command: &Commands) {
    match command {
        Commands::FetchFuel { mock, no_detect, .. } => {
            if *mock {
                config.fuel.use_scraping = false;
            }
            if *no_detect {
                config.detect.auto_detect = false;
            }
        }
        Commands::FetchExchange { mock, no_detect } => {
            if *mock {
                config.exchange.use_mock = true;
            }
            if *no_detect {
                config.detect.auto_detect = false;
            }
        }
        Commands::FetchAll { mock, .. } => {
            if *mock {
                config.fuel.use_scraping = false;
                config.exchange.use_mock = true;
            }
        }
        Commands::FetchNews { mock, mock_analysis } => {
            if *mock {
                config.news.use_mock = true;
            }
            if *mock_analysis {
                config.news.use_mock_analysis = true;
            }
        }
        _ => {}
    }
}

/// 최근 두 연료 가격 관측을 비교하고 뉴스 기반 해설을 생성합니다.
async fn explain_latest_change(
    store: &SqliteStore,
    config: &CollectorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let prices = store.all_fuel_prices().await?;
    if prices.len() < 2 {
        tracing::warn!("비교할 연료 가격 관측이 2개 미만입니다");
        return Ok(());
    }
    // all_fuel_prices는 날짜 내림차순
    let (newest, previous) = (&prices[0], &prices[1]);

    let articles = if config.news.use_mock {
        fuelwatch_data::MockNewsFetcher
            .fetch_top_news(&config.news.query)
            .await?
    } else {
        let api_key = config.news.api_key.as_deref().ok_or(
            "NEWSAPI_KEY 환경변수가 설정되지 않았습니다",
        )?;
        fuelwatch_data::NewsFetcher::new(api_key)?
            .fetch_top_news(&config.news.query)
            .await?
    };

    tracing::info!(
        price_old = previous.regular,
        price_new = newest.regular,
        articles = articles.len(),
        "변동 해설 생성 시작"
    );

    let analyzer = modules::build_analyzer(config)?;
    let explanation = analyzer
        .explain_change(previous.regular, newest.regular, &articles)
        .await?;

    println!("━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", explanation);
    println!("━━━━━━━━━━━━━━━━━━━━━━");
    Ok(())
}

/// 데몬 루프: 주기마다 전체 워크플로우를 실행합니다.
///
/// 단계별 실패는 로그로 남기고 다음 주기를 기다립니다.
async fn run_daemon(
    store: &SqliteStore,
    config: &CollectorConfig,
    notifier: Option<&dyn NotificationSender>,
) {
    tracing::info!(
        "=== 데몬 모드 시작 (주기: {}분) ===",
        config.daemon.interval_minutes
    );

    let mut interval = tokio::time::interval(config.daemon.interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("종료 신호 수신, 데몬 종료 중...");
                break;
            }
            _ = interval.tick() => {
                tracing::info!("=== 워크플로우 실행 시작 ===");

                // 1. 연료 가격 수집
                match modules::fetch_fuel_price(store, config, None).await {
                    Ok(price) => {
                        tracing::info!(date = %price.date, regular = price.regular, "연료 가격 수집 성공");
                    }
                    Err(e) => {
                        tracing::error!("연료 가격 수집 실패: {}", e);
                    }
                }

                // 2. 환율 수집
                match modules::fetch_exchange_rate(store, config).await {
                    Ok(rate) => {
                        tracing::info!(date = %rate.date, usd_jpy = rate.usd_jpy, "환율 수집 성공");
                    }
                    Err(e) => {
                        tracing::error!("환율 수집 실패: {}", e);
                    }
                }

                // 3. 변동 감지
                if let Err(e) = modules::detect_changes(store, config, notifier).await {
                    tracing::error!("변동 감지 실패: {}", e);
                }

                tracing::info!(
                    "=== 워크플로우 완료, 다음 실행: {}분 후 ===",
                    config.daemon.interval_minutes
                );
            }
        }
    }
}

fn print_fuel_price(price: &fuelwatch_core::FuelPrice) {
    println!("━━━━━━━━━━━━━━━━━━━━━━");
    println!("ガソリン価格");
    println!("━━━━━━━━━━━━━━━━━━━━━━");
    println!("日付:       {}", price.date);
    println!("地域:       {}", price.region);
    println!("レギュラー: {:.2}円", price.regular);
    println!("ハイオク:   {:.2}円", price.premium);
    println!("軽油:       {:.2}円", price.diesel);
    println!("━━━━━━━━━━━━━━━━━━━━━━");
}

fn print_exchange_rate(rate: &fuelwatch_core::ExchangeRate) {
    println!("━━━━━━━━━━━━━━━━━━━━━━");
    println!("為替レート");
    println!("━━━━━━━━━━━━━━━━━━━━━━");
    println!("日付:    {}", rate.date);
    println!("USD/JPY: {:.2}円", rate.usd_jpy);
    println!("EUR/JPY: {:.2}円", rate.eur_jpy);
    println!("GBP/JPY: {:.2}円", rate.gbp_jpy);
    println!("CNY/JPY: {:.2}円", rate.cny_jpy);
    println!("━━━━━━━━━━━━━━━━━━━━━━");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_library_crates() {
        // 스크레이퍼 실패 warn, flagged 변동의 alert 라인은 라이브러리
        // crate에서 발생하므로 기본 필터가 전부 포함해야 함
        let directive = default_filter_directive("info");
        for target in [
            "fuelwatch_collector=info",
            "fuelwatch_core=info",
            "fuelwatch_data=info",
            "fuelwatch_detect=info",
            "fuelwatch_notification=info",
        ] {
            assert!(directive.contains(target), "{target} 누락: {directive}");
        }
    }

    #[test]
    fn test_default_filter_directive_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(default_filter_directive("debug")).is_ok());
    }

    #[test]
    fn test_log_level_after_subcommand() {
        let cli = Cli::try_parse_from(["fuelwatch-collector", "detect", "--log-level", "debug"])
            .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Commands::Detect));
    }

    #[test]
    fn test_log_level_defaults_to_info() {
        let cli = Cli::try_parse_from(["fuelwatch-collector", "detect"]).unwrap();
        assert_eq!(cli.log_level, "info");
    }
}
