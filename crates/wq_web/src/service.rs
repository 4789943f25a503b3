use tracing::info;

use wq_core::{Error, NewQuizRecord, QuizData, Result};

use crate::state::AppState;

/// The generate-quiz flow: validate, check the cache, scrape, generate,
/// persist. Returns the record id and the quiz itself.
pub async fn create_quiz(state: &AppState, url: &str) -> Result<(i64, QuizData)> {
    let url = url.trim();
    if !state.scraper.can_handle(url) {
        return Err(Error::InvalidUrl("Invalid Wikipedia URL".to_string()));
    }

    if let Some(existing) = state.storage.find_by_url(url).await? {
        info!("cache hit for {}, returning quiz {}", url, existing.id);
        let quiz: QuizData = serde_json::from_str(&existing.quiz_data)?;
        return Ok((existing.id, quiz));
    }

    // Reachability check on the raw URL, independent of the scrape fetch.
    state.scraper.probe(url).await?;

    info!("scraping {} via {}", url, state.scraper.source());
    let page = state.scraper.scrape(url).await?;

    let quiz = state
        .generator
        .generate_quiz(&page.title, &page.content)
        .await?;

    let title = if quiz.title.is_empty() {
        page.title.clone()
    } else {
        quiz.title.clone()
    };

    let record = state
        .storage
        .insert(NewQuizRecord {
            url: url.to_string(),
            title,
            scraped_content: Some(page.content),
            quiz_data: serde_json::to_string(&quiz)?,
        })
        .await?;

    info!("stored quiz {} for {}", record.id, url);
    Ok((record.id, quiz))
}

/// The preview flow: validate and fetch only the article title. Touches
/// neither the store nor the generator.
pub async fn preview(state: &AppState, url: &str) -> Result<String> {
    let url = url.trim();
    if !state.scraper.can_handle(url) {
        return Err(Error::InvalidUrl("Invalid Wikipedia URL".to_string()));
    }

    state
        .scraper
        .fetch_title(url)
        .await
        .map_err(|e| Error::Scraping(format!("Error previewing article: {}", e)))
}
