//! Current per-item rate lookup.

use tracing::{debug, warn};

use kurir_core::rate::resolve_rate;
use kurir_db::Database;

use crate::error::PayrollResult;

/// Reads the configured delivery rate, falling back to a fixed default.
#[derive(Debug, Clone)]
pub struct RateResolver {
    db: Database,
    fallback: i64,
}

impl RateResolver {
    pub fn new(db: Database, fallback: i64) -> Self {
        RateResolver { db, fallback }
    }

    /// Rate to snapshot into a new delivery.
    pub async fn current_rate(&self) -> PayrollResult<i64> {
        let configured = self.db.settings().current_rate().await?;
        let rate = resolve_rate(configured, self.fallback);

        match configured {
            Some(value) if value != rate => {
                warn!(configured = value, rate, "Configured rate is not positive, using default");
            }
            _ => debug!(rate, "Resolved delivery rate"),
        }

        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurir_core::SettingsPatch;
    use kurir_db::DbConfig;

    #[tokio::test]
    async fn test_rate_follows_settings() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let resolver = RateResolver::new(db.clone(), 3000);

        assert_eq!(resolver.current_rate().await.unwrap(), 3000);

        db.settings()
            .update(&SettingsPatch {
                delivery_rate: Some(3500),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(resolver.current_rate().await.unwrap(), 3500);
    }
}
