//! Known upstream titles and their defaults
//!
//! Values observed from the public status APIs each title is served from.

/// Shared polling defaults
pub mod polling {
    /// Interval between poll cycles (milliseconds)
    pub const POLL_INTERVAL_MS: u64 = 10_000;

    /// Per-request HTTP timeout (milliseconds)
    pub const REQUEST_TIMEOUT_MS: u64 = 15_000;

    /// Retries after the first failed attempt
    pub const MAX_RETRIES: u32 = 3;

    /// Fixed delay between attempts (milliseconds)
    pub const RETRY_DELAY_MS: u64 = 10_000;
}

/// MotorStorm Arctic Edge on the Medius database API
pub mod arctic_edge {
    pub const ID: &str = "motorstorm_ae";
    pub const DISPLAY_NAME: &str = "MotorStorm Arctic Edge";
    pub const BASE_URL: &str = "https://svo.agracingfoundation.org/medius_db/api";
    pub const APP_ID: &str = "22204";
    pub const MAX_PLAYERS: u32 = 6;
    /// `GameName` carries a `~<hash>` suffix
    pub const ROOM_NAME_DELIMITER: &str = "~";
}

/// MotorStorm Monument Valley on the Rewired API
pub mod monument_valley {
    pub const ID: &str = "motorstorm_mv";
    pub const DISPLAY_NAME: &str = "MotorStorm NTSC";
    pub const BASE_URL: &str = "https://api.psrewired.com/us/api";
    pub const APP_ID: &str = "20764";
    pub const MAX_PLAYERS: u32 = 12;
}

/// MotorStorm Pacific Rift on the Rewired API
pub mod pacific_rift {
    pub const ID: &str = "motorstorm_pr";
    pub const DISPLAY_NAME: &str = "Pacific Rift";
    pub const BASE_URL: &str = "https://api.psrewired.com/us/api";
    pub const APP_ID: &str = "21624";
    pub const MAX_PLAYERS: u32 = 12;
}

/// MotorStorm Apocalypse on the PSORG revival room dump
pub mod apocalypse {
    pub const ID: &str = "motorstorm_msa";
    pub const DISPLAY_NAME: &str = "MotorStorm Apocalypse";
    pub const BASE_URL: &str = "http://api.psorg-web-revival.us:61920";
    pub const APP_ID: &str = "22500";
    pub const MAX_PLAYERS: u32 = 16;
    pub const RETRY_DELAY_MS: u64 = 5_000;
}
