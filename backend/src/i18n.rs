use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::api_client::ApiError;
use crate::error::{ChartError, SeriesError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" => Ok(Language::Zh),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// UI strings for one language
#[derive(Debug, Clone, Serialize)]
pub struct Texts {
    pub title: String,
    pub stock_label: String,
    pub start_date: String,
    pub end_date: String,
    pub indicator: String,
    pub generate: String,
    pub xaxis: String,
    pub yaxis: String,
    pub error_no_data: String,
    pub error_provider: String,
    pub error_date_range: String,
    pub error_series: String,
    pub error_invalid_data: String,
}

impl Texts {
    /// Pick the message for an error kind
    pub fn error_message(&self, err: &ChartError) -> &str {
        match err {
            ChartError::DataProvider(ApiError::NoData { .. }) => &self.error_no_data,
            ChartError::DataProvider(_) => &self.error_provider,
            ChartError::InvalidDateRange { .. } => &self.error_date_range,
            ChartError::Series(SeriesError::NonFiniteClose { .. } | SeriesError::NonAscendingDates { .. }) => {
                &self.error_invalid_data
            }
            ChartError::Series(_) => &self.error_series,
        }
    }
}

/// All language tables, injected into the app state
#[derive(Debug, Clone)]
pub struct LanguageTable {
    zh: Texts,
    en: Texts,
    fallback: Language,
}

impl LanguageTable {
    pub fn builtin(fallback: Language) -> Self {
        let zh = Texts {
            title: "股票RSI/MACD分析工具".to_string(),
            stock_label: "選擇股票".to_string(),
            start_date: "起始日".to_string(),
            end_date: "結束日".to_string(),
            indicator: "分析指標".to_string(),
            generate: "產生圖表".to_string(),
            xaxis: "日期".to_string(),
            yaxis: "股價 (台幣)".to_string(),
            error_no_data: "❌ 找不到資料，請確認股票代碼或公司名稱是否正確！".to_string(),
            error_provider: "❌ 無法取得股價資料，請稍後再試。".to_string(),
            error_date_range: "❌ 起始日必須早於結束日。".to_string(),
            error_series: "❌ 資料不足，無法計算指標。".to_string(),
            error_invalid_data: "❌ 股價資料含有無效數值。".to_string(),
        };
        let en = Texts {
            title: "Stock RSI/MACD Analysis Tool".to_string(),
            stock_label: "Select Stock".to_string(),
            start_date: "Start Date".to_string(),
            end_date: "End Date".to_string(),
            indicator: "Indicator".to_string(),
            generate: "Generate Chart".to_string(),
            xaxis: "Date".to_string(),
            yaxis: "Price (TWD)".to_string(),
            error_no_data: "❌ No data found. Please check if the stock ticker or company name is correct!"
                .to_string(),
            error_provider: "❌ Could not reach the price data provider. Please try again later.".to_string(),
            error_date_range: "❌ The start date must be before the end date.".to_string(),
            error_series: "❌ Not enough price data to compute indicators.".to_string(),
            error_invalid_data: "❌ The price data contains invalid values.".to_string(),
        };

        Self { zh, en, fallback }
    }

    pub fn get(&self, language: Language) -> &Texts {
        match language {
            Language::Zh => &self.zh,
            Language::En => &self.en,
        }
    }

    /// Texts for an optional `lang` parameter, unknown codes use the fallback
    pub fn for_code(&self, code: Option<&str>) -> (Language, &Texts) {
        let language = code
            .and_then(|c| c.parse().ok())
            .unwrap_or(self.fallback);
        (language, self.get(language))
    }
}
