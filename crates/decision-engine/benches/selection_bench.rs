//! Benchmark for arm selection over a realistic registry.
//! Run with: cargo bench -p postpulse-decision-engine

use chrono::Utc;
use postpulse_core::config::EngineConfig;
use postpulse_core::types::{
    ArmDefinition, AudienceSegment, ContentType, DecisionContext, Platform, RewardEvent,
};
use postpulse_decision_engine::DecisionEngine;

fn bench_context() -> DecisionContext {
    DecisionContext {
        account_id: "bench-acct".to_string(),
        platform: Platform::Instagram,
        content_type: ContentType::Reel,
        audience_segment: AudienceSegment::EngagedFollowers,
        hour_of_day: 19,
        day_of_week: 4,
        content_length: 180,
        historical_engagement: 0.35,
        has_hashtags: true,
        has_thumbnail: true,
    }
}

fn main() {
    let engine = DecisionEngine::with_seed(EngineConfig::default(), 7);
    for i in 0..50 {
        engine
            .add_arm(ArmDefinition {
                id: format!("arm-{i:02}"),
                name: format!("strategy {i}"),
                parameters: serde_json::json!({}),
                feature_vector: None,
                version: "v1".to_string(),
                created_at: Utc::now(),
            })
            .expect("arm registration failed");
    }

    let ctx = bench_context();

    // Warm every arm so no score short-circuits on cold state.
    for i in 0..50 {
        engine.update_reward(&RewardEvent::new(
            format!("arm-{i:02}"),
            ctx.clone(),
            0.4 + (i as f64) * 0.01,
        ));
    }

    // Warmup
    for _ in 0..100 {
        let _ = engine.select_arm(&ctx).unwrap();
    }

    let iterations = 10_000u32;
    let start = std::time::Instant::now();
    for _ in 0..iterations {
        let _ = engine.select_arm(&ctx).unwrap();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations;

    println!("=== Selection Benchmark ===");
    println!("Arms:        50");
    println!("Iterations:  {}", iterations);
    println!("Total time:  {:?}", elapsed);
    println!("Per call:    {:?}", per_iter);
    println!(
        "Throughput:  {:.0} selections/sec",
        f64::from(iterations) / elapsed.as_secs_f64()
    );
}
