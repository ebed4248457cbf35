//! HTTP client for the reporting portal.

use chrono::NaiveDate;
use common::{Error, Result, TradeRecord};
use tracing::{debug, info};

use crate::parse::parse_trades;

const USER_AGENT: &str = "prop-coach/0.1";

/// Async client for a PropReports-style portal.
///
/// Credentials are supplied at construction, never read from global
/// state. Login happens over a posted form; the portal answers with a
/// session cookie that every later request replays. Fetches are a
/// single attempt, a failed batch run is simply re-run.
pub struct PropReportsClient {
    client: reqwest::Client,
    base_url: String,
    account: String,
    password: String,
    session: Option<String>,
}

impl PropReportsClient {
    pub fn new(domain: &str, account: &str, password: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            // the portal 302s after login; following it would drop the
            // Set-Cookie we need
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("https://{}", domain),
            account: account.to_string(),
            password: password.to_string(),
            session: None,
        })
    }

    /// Post the login form and capture the portal session cookie.
    pub async fn login(&mut self) -> Result<()> {
        let url = format!("{}/login.php", self.base_url);
        let form = [
            ("user", self.account.as_str()),
            ("password", self.password.as_str()),
        ];

        let resp = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        if status != 200 && status != 302 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::PropReportsApi {
                status,
                message: snippet(&body),
            });
        }

        let cookie = resp
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|v| v.starts_with("PHPSESSID="))
            .map(|v| v.to_string());

        match cookie {
            Some(session) => {
                info!("Logged in to {} as {}", self.base_url, self.account);
                self.session = Some(session);
                Ok(())
            }
            None => Err(Error::Auth(format!(
                "no session cookie returned for account {}",
                self.account
            ))),
        }
    }

    /// Fetch the trades report for an inclusive date window.
    pub async fn fetch_trades(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TradeRecord>> {
        let session = self
            .session
            .as_deref()
            .ok_or_else(|| Error::Auth("login() must be called before fetching reports".into()))?
            .to_string();

        let url = format!("{}/report.php", self.base_url);
        let start_s = start.format("%Y-%m-%d").to_string();
        let end_s = end.format("%Y-%m-%d").to_string();
        let form = [
            ("reportType", "trades"),
            ("startDate", start_s.as_str()),
            ("endDate", end_s.as_str()),
            ("format", "csv"),
        ];

        debug!("Fetching trades report {} .. {}", start_s, end_s);
        let resp = self
            .client
            .post(&url)
            .header(reqwest::header::COOKIE, session)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::PropReportsApi {
                status,
                message: snippet(&body),
            });
        }

        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
        let trades = parse_trades(&body)?;
        debug!("Parsed {} rows from report body", trades.len());
        Ok(trades)
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_before_login_is_rejected() {
        let client = PropReportsClient::new("demo.propreports.test", "DEMO1", "pw", 30).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();
        let err = client.fetch_trades(start, start).await;
        assert!(matches!(err, Err(Error::Auth(_))));
    }

    #[test]
    fn test_base_url_from_domain() {
        let client = PropReportsClient::new("demo.propreports.test", "DEMO1", "pw", 30).unwrap();
        assert_eq!(client.base_url, "https://demo.propreports.test");
        assert!(client.session.is_none());
    }

    #[test]
    fn test_snippet_truncates_long_bodies() {
        let body = "x".repeat(2000);
        assert_eq!(snippet(&body).len(), 500);
        assert_eq!(snippet("short"), "short");
    }
}
