//! 뉴스 수집/분석 모듈.

use crate::{CollectionStats, CollectorConfig, CollectorError, Result};
use fuelwatch_core::NewsArticle;
use fuelwatch_data::{MockNewsFetcher, NewsFetcher, SqliteStore};
use fuelwatch_detect::{AnalyzerError, GeminiAnalyzer, MockAnalyzer, NewsAnalyzer};
use std::time::Instant;

/// 설정에 맞는 뉴스 분석기를 생성합니다.
pub fn build_analyzer(config: &CollectorConfig) -> Result<Box<dyn NewsAnalyzer>> {
    if config.news.use_mock_analysis {
        Ok(Box::new(MockAnalyzer::new()))
    } else {
        Ok(Box::new(GeminiAnalyzer::from_env()?))
    }
}

/// 뉴스를 수집하고 기사별로 분석/저장합니다.
///
/// 기사 하나의 분석/저장 실패는 해당 기사만 건너뛰고 계속합니다.
/// 레이트 리밋(429)도 동일하게 처리하되 경고로 구분해 남깁니다.
pub async fn fetch_news(
    store: &SqliteStore,
    config: &CollectorConfig,
    analyzer: &dyn NewsAnalyzer,
) -> Result<CollectionStats> {
    let start = Instant::now();
    let mut stats = CollectionStats::new();

    tracing::info!(query = %config.news.query, "뉴스 수집 시작");

    let articles: Vec<NewsArticle> = if config.news.use_mock {
        MockNewsFetcher.fetch_top_news(&config.news.query).await?
    } else {
        let api_key = config.news.api_key.as_deref().ok_or_else(|| {
            CollectorError::Config("NEWSAPI_KEY 환경변수가 설정되지 않았습니다".to_string())
        })?;
        NewsFetcher::new(api_key)?
            .fetch_top_news(&config.news.query)
            .await?
    };

    if articles.is_empty() {
        tracing::info!("수집된 뉴스가 없습니다");
        stats.elapsed = start.elapsed();
        return Ok(stats);
    }

    tracing::info!(count = articles.len(), "뉴스 수집 완료, 분석 시작");

    for (idx, article) in articles.iter().enumerate() {
        stats.total += 1;

        tracing::debug!(
            progress = format!("{}/{}", idx + 1, articles.len()),
            title = %article.title,
            "기사 분석 시작"
        );

        // 무료 쿼터 레이트 리밋 회피용 대기 (실제 분석기일 때만)
        if idx > 0 && !config.news.use_mock_analysis {
            tokio::time::sleep(config.news.analysis_delay()).await;
        }

        let analyzed = match analyzer.analyze_article(article).await {
            Ok(analyzed) => analyzed,
            Err(AnalyzerError::RateLimited) => {
                tracing::warn!(title = %article.title, "레이트 리밋 초과, 기사 건너뜀");
                stats.errors += 1;
                continue;
            }
            Err(e) => {
                tracing::warn!(title = %article.title, error = %e, "분석 실패, 기사 건너뜀");
                stats.errors += 1;
                continue;
            }
        };

        if let Err(e) = store.save_news(&analyzed).await {
            tracing::warn!(title = %analyzed.title, error = %e, "저장 실패, 기사 건너뜀");
            stats.errors += 1;
            continue;
        }

        tracing::info!(
            title = %analyzed.title,
            sentiment = %analyzed.sentiment,
            impact = %analyzed.impact,
            "기사 분석/저장 완료"
        );
        stats.success += 1;
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}
