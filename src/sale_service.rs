use std::sync::Arc;

use serenity::all::ChannelId;
use serenity::http::Http;
use time::{Duration, OffsetDateTime, Time};
use tokio::{select, sync::Notify};
use tracing::{error, info, warn};

use crate::{
    lookup::{discount_percent, redirect_url, CheapSharkClient},
    repository::SuggestionRepository,
};

const TICK_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// When the scan runs: daily at a fixed UTC hour, or on every tick while the
/// debug toggle is set.
#[derive(Clone, Copy, Debug)]
pub struct SaleSchedule {
    pub hour_utc: u8,
    pub every_tick: bool,
}

/// Periodically scans the suggestion backlog for discounted titles and posts a
/// report to the sales channel.
pub struct SaleCheckService {
    http: Arc<Http>,
    suggestion_repository: Arc<SuggestionRepository>,
    cheapshark: Arc<CheapSharkClient>,
    channel: ChannelId,
    schedule: SaleSchedule,
}

impl SaleCheckService {
    pub fn create_and_start(
        shutdown: Arc<Notify>,
        http: Arc<Http>,
        suggestion_repository: Arc<SuggestionRepository>,
        cheapshark: Arc<CheapSharkClient>,
        channel: ChannelId,
        schedule: SaleSchedule,
    ) {
        let service = SaleCheckService {
            http,
            suggestion_repository,
            cheapshark,
            channel,
            schedule,
        };

        service.start(shutdown);
    }

    fn start(self, shutdown: Arc<Notify>) {
        tokio::spawn(async move {
            loop {
                let sleep_duration = if self.schedule.every_tick {
                    TICK_INTERVAL
                } else {
                    next_daily_delay(OffsetDateTime::now_utc(), self.schedule.hour_utc)
                };

                info!(
                    "Next sale check scheduled at {:?} (in {:?})",
                    OffsetDateTime::now_utc() + sleep_duration,
                    sleep_duration
                );

                select! {
                    _ = tokio::time::sleep(sleep_duration) => {
                        if let Err(err) = self.run_sale_check().await {
                            error!("Could not run the sale check: {err}");
                        }
                    }

                    _ = shutdown.notified() => {
                        info!("Sale check task shutting down");
                        break;
                    }
                }
            }
        });
    }

    #[tracing::instrument(skip(self))]
    pub async fn run_sale_check(&self) -> Result<(), anyhow::Error> {
        info!("Running sale check");

        let lines = collect_sale_lines(&self.suggestion_repository, &self.cheapshark).await?;
        let report = format_sale_report(&lines);

        self.channel.say(&self.http, report).await?;

        Ok(())
    }
}

/// One formatted line per suggested title currently selling below retail.
/// Per-title lookup failures are logged and skipped.
pub async fn collect_sale_lines(
    suggestions: &SuggestionRepository,
    cheapshark: &CheapSharkClient,
) -> Result<Vec<String>, anyhow::Error> {
    let mut lines = Vec::new();

    for game_name in suggestions.game_names().await? {
        let game_match = match cheapshark.find_cheapest(&game_name).await {
            Ok(Some(game_match)) => game_match,
            Ok(None) => continue,
            Err(err) => {
                warn!("Deal search failed for {game_name}: {err}");
                continue;
            }
        };

        let Some(deal_id) = game_match.cheapest_deal_id else {
            continue;
        };

        let info = match cheapshark.deal(&deal_id).await {
            Ok(Some(info)) => info,
            Ok(None) => continue,
            Err(err) => {
                warn!("Deal detail failed for {game_name}: {err}");
                continue;
            }
        };

        if let (Some(sale), Some(retail)) = (info.sale_price(), info.retail_price()) {
            if sale < retail {
                let title = info.name.unwrap_or(game_name);
                lines.push(sale_line(&title, sale, retail, &deal_id));
            }
        }
    }

    Ok(lines)
}

fn sale_line(title: &str, sale_price: f64, retail_price: f64, deal_id: &str) -> String {
    format!(
        "💸 **{title}** is on sale! **${sale_price:.2}** (was ${retail_price:.2}, {discount}% off)\n👉 [Buy here]({url})",
        discount = discount_percent(sale_price, retail_price),
        url = redirect_url(deal_id),
    )
}

pub fn format_sale_report(lines: &[String]) -> String {
    if lines.is_empty() {
        "🔍 No sales found for saved games today.".to_string()
    } else {
        format!("🛍️ **Today's Game Sales:**\n{}", lines.join("\n"))
    }
}

/// Time until the next occurrence of `hour_utc`:00:00, strictly in the future.
fn next_daily_delay(now: OffsetDateTime, hour_utc: u8) -> std::time::Duration {
    let target = Time::from_hms(hour_utc % 24, 0, 0).expect("Hour is reduced mod 24");

    let today_run = now.replace_time(target);
    let next_run = if today_run > now {
        today_run
    } else {
        today_run + Duration::days(1)
    };

    (next_run - now).unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn delay_counts_down_to_todays_run() {
        let now = datetime!(2025-04-15 09:30:00 UTC);
        let delay = next_daily_delay(now, 12);
        assert_eq!(delay, std::time::Duration::from_secs(2 * 3600 + 30 * 60));
    }

    #[test]
    fn delay_rolls_over_to_tomorrow() {
        let now = datetime!(2025-04-15 12:00:00 UTC);
        let delay = next_daily_delay(now, 12);
        assert_eq!(delay, std::time::Duration::from_secs(24 * 3600));
    }

    #[test]
    fn sale_lines_carry_discount_and_redirect() {
        let line = sale_line("Hades", 15.0, 20.0, "deadbeef");
        assert!(line.contains("**Hades** is on sale!"));
        assert!(line.contains("**$15.00**"));
        assert!(line.contains("was $20.00"));
        assert!(line.contains("25% off"));
        assert!(line.contains("https://www.cheapshark.com/redirect?dealID=deadbeef"));
    }

    #[test]
    fn empty_scan_reports_no_sales() {
        assert_eq!(
            format_sale_report(&[]),
            "🔍 No sales found for saved games today."
        );
    }

    #[test]
    fn report_aggregates_all_lines() {
        let lines = vec!["line one".to_string(), "line two".to_string()];
        let report = format_sale_report(&lines);
        assert!(report.starts_with("🛍️ **Today's Game Sales:**\n"));
        assert!(report.contains("line one\nline two"));
    }
}
