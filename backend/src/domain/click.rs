//! Social-media link click tracking on provider pages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform '{value}'; expected instagram, tiktok, facebook or website")]
pub struct UnknownPlatform {
    pub value: String,
}

/// Link target on a provider profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Instagram,
    Tiktok,
    Facebook,
    Website,
}

impl SocialPlatform {
    pub const ALL: [Self; 4] = [Self::Instagram, Self::Tiktok, Self::Facebook, Self::Website];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Tiktok => "tiktok",
            Self::Facebook => "facebook",
            Self::Website => "website",
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocialPlatform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPlatform {
                value: s.to_owned(),
            })
    }
}

/// Clicks for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformClicks {
    pub platform: SocialPlatform,
    pub clicks: u64,
}

/// Click counts per platform, always listing every platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickSummary {
    pub platforms: Vec<PlatformClicks>,
    pub total: u64,
}

impl ClickSummary {
    /// Build from sparse `(platform, count)` pairs; missing platforms count zero.
    pub fn from_counts(counts: &[(SocialPlatform, u64)]) -> Self {
        let platforms: Vec<_> = SocialPlatform::ALL
            .into_iter()
            .map(|platform| PlatformClicks {
                platform,
                clicks: counts
                    .iter()
                    .filter(|(p, _)| *p == platform)
                    .map(|(_, n)| *n)
                    .sum(),
            })
            .collect();
        let total = platforms.iter().map(|p| p.clicks).sum();
        Self { platforms, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Instagram", SocialPlatform::Instagram)]
    #[case(" tiktok", SocialPlatform::Tiktok)]
    fn parses_platform(#[case] raw: &str, #[case] expected: SocialPlatform) {
        assert_eq!(raw.parse::<SocialPlatform>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_platform() {
        assert!("myspace".parse::<SocialPlatform>().is_err());
    }

    #[rstest]
    fn summary_fills_missing_platforms() {
        let summary = ClickSummary::from_counts(&[
            (SocialPlatform::Website, 3),
            (SocialPlatform::Instagram, 2),
        ]);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.platforms.len(), 4);
        assert_eq!(summary.platforms[1].platform, SocialPlatform::Tiktok);
        assert_eq!(summary.platforms[1].clicks, 0);
    }
}
