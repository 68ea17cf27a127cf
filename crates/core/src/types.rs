//! Shared data types for the content decision engine — arms, decision
//! contexts, and reward events exchanged with the scheduler and the
//! content-optimization service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Social network a post is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    Tiktok,
    Youtube,
    X,
    Facebook,
    Linkedin,
    #[default]
    Other,
}

/// Content format of the post being optimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Image,
    Video,
    Carousel,
    Story,
    Reel,
    Text,
    Link,
    #[default]
    Other,
}

/// Coarse audience bucket supplied by the caller's segmentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AudienceSegment {
    Broad,
    EngagedFollowers,
    NewFollowers,
    Professional,
    Youth,
    #[default]
    Other,
}

/// Immutable snapshot of decision-time information. Built once per
/// optimization request and never mutated; missing fields fall back to
/// their defaults so a decision can always be produced.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DecisionContext {
    /// Opaque caller/account identifier. Not featurized, kept for audit.
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub audience_segment: AudienceSegment,
    /// Local posting hour, 0-23. Out-of-range values are clamped.
    #[serde(default)]
    pub hour_of_day: u8,
    /// Day of week, 0 = Monday .. 6 = Sunday. Clamped.
    #[serde(default)]
    pub day_of_week: u8,
    /// Caption/body length in characters. Negative values are clamped to 0.
    #[serde(default)]
    pub content_length: i64,
    /// Caller-normalized historical engagement rate, expected in [0, 1].
    #[serde(default)]
    pub historical_engagement: f64,
    #[serde(default)]
    pub has_hashtags: bool,
    #[serde(default)]
    pub has_thumbnail: bool,
}

/// Operator-supplied definition of a selectable optimization strategy.
///
/// `parameters` is an opaque blob interpreted only by the
/// content-optimization service after it receives the chosen arm id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parameters: serde_json::Value,
    /// Static attributes of the strategy itself, blended into the context
    /// features as a prior bias. Never mutated by learning.
    #[serde(default)]
    pub feature_vector: Option<Vec<f64>>,
    pub version: String,
    pub created_at: DateTime<Utc>,
}

/// How to handle an `add_arm` call whose id already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceMode {
    /// Swap the definition but keep the accumulated statistics. Default for
    /// version bumps so learned state survives a strategy revision.
    PreserveModel,
    /// Swap the definition and cold-start the statistics.
    ResetStatistics,
}

/// Append-only engagement outcome attributed to a prior selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardEvent {
    pub arm_id: String,
    pub context: DecisionContext,
    /// Normalized outcome in [0, 1]; out-of-range values are clamped.
    pub reward: f64,
    pub observed_at: DateTime<Utc>,
}

impl RewardEvent {
    pub fn new(arm_id: impl Into<String>, context: DecisionContext, reward: f64) -> Self {
        Self {
            arm_id: arm_id.into(),
            context,
            reward,
            observed_at: Utc::now(),
        }
    }
}
