//! Context featurization — deterministic mapping from a decision context to
//! a fixed-length numeric vector.
//!
//! Vector positions are meaning-bearing: each categorical vocabulary is a
//! fixed array whose final slot is the "other" bucket, and new values must
//! be appended, never inserted, so previously learned weights stay valid.

use postpulse_core::types::{AudienceSegment, ContentType, DecisionContext, Platform};
use serde::{Deserialize, Serialize};

/// Declared length of every feature vector this module produces.
pub const FEATURE_DIM: usize = 28;

const PLATFORM_SLOTS: usize = 7;
const CONTENT_TYPE_SLOTS: usize = 8;
const AUDIENCE_SLOTS: usize = 6;

const PLATFORM_OFFSET: usize = 1;
const CONTENT_TYPE_OFFSET: usize = PLATFORM_OFFSET + PLATFORM_SLOTS;
const AUDIENCE_OFFSET: usize = CONTENT_TYPE_OFFSET + CONTENT_TYPE_SLOTS;
const NUMERIC_OFFSET: usize = AUDIENCE_OFFSET + AUDIENCE_SLOTS;

/// Longest caption length across supported platforms (Instagram's 2200
/// character limit); longer posts saturate at 1.0.
const MAX_CONTENT_LENGTH: f64 = 2200.0;

/// Fixed-length ordered feature values for one decision context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Encode a decision context into a `FEATURE_DIM`-length vector.
///
/// Pure and deterministic: identical contexts produce bit-identical
/// vectors. Malformed numeric values are clamped into range rather than
/// rejected, so featurization never fails.
pub fn featurize(context: &DecisionContext) -> FeatureVector {
    let mut values = vec![0.0; FEATURE_DIM];

    // Intercept term.
    values[0] = 1.0;

    values[PLATFORM_OFFSET + platform_slot(context.platform)] = 1.0;
    values[CONTENT_TYPE_OFFSET + content_type_slot(context.content_type)] = 1.0;
    values[AUDIENCE_OFFSET + audience_slot(context.audience_segment)] = 1.0;

    values[NUMERIC_OFFSET] = f64::from(context.hour_of_day.min(23)) / 23.0;
    values[NUMERIC_OFFSET + 1] = f64::from(context.day_of_week.min(6)) / 6.0;
    values[NUMERIC_OFFSET + 2] =
        (context.content_length.max(0) as f64).min(MAX_CONTENT_LENGTH) / MAX_CONTENT_LENGTH;
    values[NUMERIC_OFFSET + 3] = context.historical_engagement.clamp(0.0, 1.0);
    values[NUMERIC_OFFSET + 4] = f64::from(u8::from(context.has_hashtags));
    values[NUMERIC_OFFSET + 5] = f64::from(u8::from(context.has_thumbnail));

    FeatureVector(values)
}

/// Blend an arm's static feature vector into the context features as a
/// prior bias. The static vector is truncated (or zero-padded) to
/// `FEATURE_DIM`; the same blend is applied at selection and learning time.
pub fn blend_with_arm(base: &FeatureVector, arm_static: Option<&[f64]>) -> FeatureVector {
    let Some(arm_static) = arm_static else {
        return base.clone();
    };

    let mut values = base.0.clone();
    for (slot, bias) in values.iter_mut().zip(arm_static.iter()) {
        *slot += bias;
    }
    FeatureVector(values)
}

fn platform_slot(platform: Platform) -> usize {
    match platform {
        Platform::Instagram => 0,
        Platform::Tiktok => 1,
        Platform::Youtube => 2,
        Platform::X => 3,
        Platform::Facebook => 4,
        Platform::Linkedin => 5,
        Platform::Other => PLATFORM_SLOTS - 1,
    }
}

fn content_type_slot(content_type: ContentType) -> usize {
    match content_type {
        ContentType::Image => 0,
        ContentType::Video => 1,
        ContentType::Carousel => 2,
        ContentType::Story => 3,
        ContentType::Reel => 4,
        ContentType::Text => 5,
        ContentType::Link => 6,
        ContentType::Other => CONTENT_TYPE_SLOTS - 1,
    }
}

fn audience_slot(segment: AudienceSegment) -> usize {
    match segment {
        AudienceSegment::Broad => 0,
        AudienceSegment::EngagedFollowers => 1,
        AudienceSegment::NewFollowers => 2,
        AudienceSegment::Professional => 3,
        AudienceSegment::Youth => 4,
        AudienceSegment::Other => AUDIENCE_SLOTS - 1,
    }
}
