//! Typed client for the hosted ERP backend (PostgREST conventions): staff
//! roster reads, commission writes, service item reads, and avatar fetches.
//! Every call is a single attempt; callers decide when to reload.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION},
    Client,
};
use shared::{
    domain::{Commission, MemberId},
    error::{ApiException, BackendErrorBody},
    protocol::{CommissionUpdate, MemberRow, ServiceItemRow},
};
use tracing::debug;
use url::Url;

pub mod config;
pub mod tables;

pub use config::{load_settings, normalize_project_url, Settings};
use tables::Table;

const REST_PREFIX: &str = "rest/v1";
const MEMBER_COLUMNS: &str = "id,ho_ten,avatar_url,hoa_hong_gia_tri,hoa_hong_loai,updated_at";
const SERVICE_ITEM_COLUMNS: &str = "id,ten,don_gia";

#[derive(Debug)]
pub struct BackendClient {
    http: Client,
    /// Bare client for avatar hosts; the project key must never leave the
    /// project host.
    media: Client,
    base: String,
}

impl BackendClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let base = Url::parse(&settings.project_url)
            .with_context(|| format!("invalid backend project url: {}", settings.project_url))?;
        let base = base.as_str().trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("apikey"),
            HeaderValue::from_str(&settings.anon_key).context("anon key is not header-safe")?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", settings.anon_key))
                .context("anon key is not header-safe")?,
        );
        headers.insert(
            HeaderName::from_static("x-client-info"),
            HeaderValue::from_str(&settings.client_info)
                .context("client info is not header-safe")?,
        );
        if settings.schema != "public" {
            let profile =
                HeaderValue::from_str(&settings.schema).context("schema is not header-safe")?;
            headers.insert(HeaderName::from_static("accept-profile"), profile.clone());
            headers.insert(HeaderName::from_static("content-profile"), profile);
        }

        let timeout = Duration::from_secs(settings.request_timeout_secs.max(1));
        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build backend http client")?;
        let media = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build media http client")?;

        Ok(Self { http, media, base })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/{}/{}", self.base, REST_PREFIX, table.name())
    }

    /// Staff roster ordered by name, commission columns included.
    pub async fn list_members(&self) -> Result<Vec<MemberRow>> {
        let url = self.table_url(Table::Members);
        let response = self
            .http
            .get(&url)
            .query(&[("select", MEMBER_COLUMNS), ("order", "ho_ten.asc")])
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;
        let rows: Vec<MemberRow> = Self::ensure_success(response, "list members")
            .await?
            .json()
            .await
            .context("invalid staff roster payload")?;
        debug!(count = rows.len(), "backend: staff roster fetched");
        Ok(rows)
    }

    /// Service items whose unit price anchors commission conversions.
    pub async fn list_service_items(&self) -> Result<Vec<ServiceItemRow>> {
        let url = self.table_url(Table::ServiceItems);
        let response = self
            .http
            .get(&url)
            .query(&[("select", SERVICE_ITEM_COLUMNS), ("order", "ten.asc")])
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;
        let rows: Vec<ServiceItemRow> = Self::ensure_success(response, "list service items")
            .await?
            .json()
            .await
            .context("invalid service item payload")?;
        debug!(count = rows.len(), "backend: service items fetched");
        Ok(rows)
    }

    pub async fn update_member_commission(
        &self,
        member_id: MemberId,
        commission: Commission,
    ) -> Result<()> {
        self.patch_member(
            member_id,
            &CommissionUpdate::new(commission),
            "update commission",
        )
        .await
    }

    pub async fn clear_member_commission(&self, member_id: MemberId) -> Result<()> {
        self.patch_member(member_id, &CommissionUpdate::clear(), "clear commission")
            .await
    }

    async fn patch_member(
        &self,
        member_id: MemberId,
        update: &CommissionUpdate,
        operation: &str,
    ) -> Result<()> {
        let url = self.table_url(Table::Members);
        let response = self
            .http
            .patch(&url)
            .query(&[("id", format!("eq.{}", member_id.0))])
            .header("Prefer", "return=minimal")
            .json(update)
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;
        Self::ensure_success(response, operation).await?;
        debug!(
            member_id = member_id.0,
            amount = update.amount,
            kind = update.kind.as_wire(),
            "backend: commission written"
        );
        Ok(())
    }

    /// Cheap reachability probe used at startup; hits a table every deploy
    /// has rows in.
    pub async fn check_connection(&self) -> Result<()> {
        let url = self.table_url(Table::Customers);
        let response = self
            .http
            .get(&url)
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;
        Self::ensure_success(response, "connection check").await?;
        Ok(())
    }

    pub async fn fetch_avatar(&self, avatar_url: &str) -> Result<Vec<u8>> {
        let url =
            Url::parse(avatar_url).with_context(|| format!("invalid avatar url: {avatar_url}"))?;
        let response = self
            .media
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to fetch avatar: {avatar_url}"))?;
        let bytes = Self::ensure_success(response, "fetch avatar")
            .await?
            .bytes()
            .await
            .context("failed to read avatar bytes")?;
        Ok(bytes.to_vec())
    }

    async fn ensure_success(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: BackendErrorBody = response.json().await.unwrap_or_default();
        let message = body
            .summary()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{operation} failed with status {status}"));
        Err(ApiException::from_status(status.as_u16(), message).into())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
