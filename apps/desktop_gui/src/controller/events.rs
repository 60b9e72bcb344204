//! Events flowing from the backend worker to the UI, and the error model
//! that turns backend failures into operator guidance.

use shared::{
    domain::{Commission, MemberId},
    protocol::{MemberRow, ServiceItemRow},
};

/// Decoded avatar pixels. Produced on the worker thread; the UI thread
/// uploads them as a texture.
pub struct AvatarImage {
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

pub enum UiEvent {
    Info(String),
    RosterLoaded(Vec<MemberRow>),
    ServiceItemsLoaded(Vec<ServiceItemRow>),
    CommissionSaved {
        member_id: MemberId,
        commission: Commission,
    },
    CommissionCleared {
        member_id: MemberId,
    },
    AvatarReady {
        member_id: MemberId,
        image: AvatarImage,
    },
    AvatarFailed {
        member_id: MemberId,
        reason: String,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

/// Which operation produced the error; drives the headline wording and
/// whether a roster reload is worth triggering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadRoster,
    SaveCommission,
    ClearCommission,
    FetchAvatar,
    General,
}

/// Turns a startup failure into a one-line hint the operator can act on
/// without reading logs.
pub fn classify_startup_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("backend worker startup failure") || lower.contains("failed to build runtime")
    {
        "Worker thread failed to start; check the log output, then relaunch the app.".to_string()
    } else if lower.contains("supabase_url")
        || lower.contains("supabase_anon_key")
        || lower.contains("is not configured")
        || lower.contains("missing backend")
    {
        "Backend credentials missing; set SUPABASE_URL and SUPABASE_ANON_KEY (or edit \
         commission_desk.toml) and restart."
            .to_string()
    } else if lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Project unreachable; check the project URL and network, then reload.".to_string()
    } else {
        format!("Backend error: {message}")
    }
}

fn classify_message(message: &str) -> UiErrorCategory {
    let lower = message.to_ascii_lowercase();
    let has = |needle: &str| lower.contains(needle);

    // Auth first: a row-level-security denial also contains "denied" and
    // would otherwise read as validation.
    if has("401")
        || has("403")
        || has("unauthorized")
        || has("forbidden")
        || has("jwt")
        || has("api key")
        || has("apikey")
        || has("permission denied")
        || has("row-level security")
    {
        UiErrorCategory::Auth
    } else if has("invalid") || has("malformed") || has("violates") || has("missing") {
        UiErrorCategory::Validation
    } else if has("timeout")
        || has("timed out")
        || has("connect")
        || has("network")
        || has("unreachable")
        || has("unavailable")
        || has("dns")
    {
        UiErrorCategory::Transport
    } else {
        UiErrorCategory::Unknown
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let category = classify_message(&message);
        Self {
            category,
            context,
            message,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
