//! Backend commands queued from UI to backend worker.

use shared::domain::{Commission, MemberId};

pub enum BackendCommand {
    LoadRoster,
    UpdateCommission {
        member_id: MemberId,
        commission: Commission,
    },
    ClearCommission {
        member_id: MemberId,
    },
    FetchAvatar {
        member_id: MemberId,
        url: String,
    },
}
