use crate::refresh::Target;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct Cfg {
    pub page: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<PathBuf>,
    pub locale: String,
    pub utc_offset: String,
    #[serde(with = "humantime_serde")]
    pub period: Duration,
    pub target: Target,
}

// sane defaults
impl Default for Cfg {
    fn default() -> Self {
        Self {
            page: PathBuf::from("page.json"),
            // rewrite the snapshot in place
            output: None,
            html: None,
            locale: "en".to_string(),
            utc_offset: "+00:00".to_string(),
            period: Duration::from_secs(30),
            target: Target::default(),
        }
    }
}

impl Cfg {
    pub fn output(&self) -> &PathBuf {
        self.output.as_ref().unwrap_or(&self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg: Cfg = serde_json::from_value(json!({ "locale": "pt-BR", "period": "1m 30s" })).unwrap();
        assert_eq!(cfg.locale, "pt-BR");
        assert_eq!(cfg.period, Duration::from_secs(90));
        assert_eq!(cfg.utc_offset, "+00:00");
        assert_eq!(cfg.target, Target::default());
        assert_eq!(cfg.output(), &PathBuf::from("page.json"));
    }

    #[test]
    fn default_config_round_trips_through_json5() {
        let s = serde_json::to_string(&Cfg::default()).unwrap();
        let cfg: Cfg = json5::from_str(&s).unwrap();
        assert_eq!(cfg.period, Duration::from_secs(30));
        assert_eq!(cfg.page, PathBuf::from("page.json"));
    }

    #[test]
    fn table_target_from_config() {
        let cfg: Cfg = json5::from_str(
            r#"{ page: "transfer.json", output: "out.json", target: { kind: "table", id: "transfer-table", column: 1 } }"#,
        )
        .unwrap();
        assert_eq!(
            cfg.target,
            Target::Table {
                id: "transfer-table".to_string(),
                column: 1
            }
        );
        assert_eq!(cfg.output(), &PathBuf::from("out.json"));
    }
}
