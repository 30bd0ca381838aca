//! Sequential black-box test battery for a content-generation agent.
//!
//! Steps run in order because later checks read what earlier steps caused
//! the service to store. Failures are recorded as results, never raised:
//! the harness always hands its caller a well-formed result list or report.

use std::collections::HashSet;

use promptqa_core::{AgentId, AgentPrompt, AgentTestReport, QualityMetrics, TestResult};
use serde_json::json;
use tracing::{info, warn};

use crate::client::{AgentService, GenerateRequest, Result, TopicSpec};
use crate::evaluate::evaluate_prompt_quality;

/// Mean stored quality score at or above which the score check passes.
const SCORE_PASS_THRESHOLD: f64 = 75.0;

/// Mean stored quality score at or above which the score check only warns.
const SCORE_WARN_THRESHOLD: f64 = 60.0;

/// Duplicate-topic rate above which the report warns. Strict: a rate equal
/// to the threshold does not warn.
const DUPLICATE_WARN_RATE: f64 = 0.10;

/// Mean metric value below which a recommendation is emitted.
const RECOMMEND_BELOW: f64 = 70.0;

/// Keywords the canned report battery generates against.
const REPORT_KEYWORDS: [&str; 3] = ["photography", "marketing", "writing"];

/// How many topics one battery run submits for generation.
const GENERATION_BATCH: usize = 3;

/// How many stored prompts the battery fetches.
const STORAGE_FETCH: usize = 10;

/// How many fetched prompts the metadata and score checks inspect.
const CHECK_SAMPLE: usize = 5;

/// How many recent prompts the report evaluates for metrics.
const REPORT_SAMPLE: usize = 50;

/// Runs test batteries against an agent service.
pub struct TestHarness<S> {
    service: S,
}

impl<S: AgentService> TestHarness<S> {
    /// Create a harness over a service client.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Run the check battery for one agent.
    ///
    /// Always returns a result list; a transport or decode error anywhere in
    /// the sequence collapses into a single failing `Test Execution` entry.
    pub async fn test_generation(
        &self,
        agent_id: AgentId,
        keywords: &[String],
    ) -> Vec<TestResult> {
        match self.run_battery(agent_id, keywords).await {
            Ok(results) => results,
            Err(e) => vec![TestResult::fail(
                "Test Execution",
                format!("Test suite failed: {}", e),
            )],
        }
    }

    async fn run_battery(
        &self,
        agent_id: AgentId,
        keywords: &[String],
    ) -> Result<Vec<TestResult>> {
        let mut results = Vec::new();

        info!("Running test battery for agent {}", agent_id);

        let agent = match self.service.fetch_agent(agent_id).await? {
            Some(agent) => {
                results.push(
                    TestResult::pass("Agent Exists", "Agent found").with_details(json!({
                        "name": agent.name,
                        "quality_threshold": agent.quality_threshold,
                    })),
                );
                agent
            }
            None => {
                results.push(TestResult::fail(
                    "Agent Exists",
                    format!("Agent {} not found", agent_id),
                ));
                return Ok(results);
            }
        };

        let topics: Vec<TopicSpec> = keywords
            .iter()
            .take(GENERATION_BATCH)
            .map(|keyword| TopicSpec {
                keyword: keyword.clone(),
                topic: format!("{} guide", keyword),
            })
            .collect();
        let request = GenerateRequest {
            agent_id,
            batch_size: topics.len(),
            topics,
        };
        let response = self.service.generate(&request).await?;
        if !response.success {
            results.push(TestResult::fail(
                "Prompt Generation",
                response
                    .error
                    .unwrap_or_else(|| "Generation reported failure".to_string()),
            ));
            return Ok(results);
        }
        results.push(TestResult::pass(
            "Prompt Generation",
            format!("Generated {} prompts", response.generated),
        ));

        let prompts = self.service.list_prompts(agent_id, STORAGE_FETCH).await?;
        if prompts.is_empty() {
            results.push(TestResult::warning(
                "Prompt Storage",
                "No stored prompts found for agent",
            ));
            // The remaining checks sample stored output; nothing to sample.
            return Ok(results);
        }
        results.push(TestResult::pass(
            "Prompt Storage",
            format!("Found {} stored prompts", prompts.len()),
        ));

        let sample = &prompts[..prompts.len().min(CHECK_SAMPLE)];
        let complete = sample.iter().filter(|p| has_complete_metadata(p)).count();
        if complete == sample.len() {
            results.push(TestResult::pass(
                "Metadata Completeness",
                format!("All {} sampled prompts have complete metadata", sample.len()),
            ));
        } else {
            results.push(TestResult::warning(
                "Metadata Completeness",
                format!(
                    "{} of {} sampled prompts have complete metadata",
                    complete,
                    sample.len()
                ),
            ));
        }

        let average = sample
            .iter()
            .map(|p| p.quality_score.unwrap_or(0.0))
            .sum::<f64>()
            / sample.len() as f64;
        let message = format!(
            "Average quality score {:.1} across {} prompts",
            average,
            sample.len()
        );
        let score_result = if average >= SCORE_PASS_THRESHOLD {
            TestResult::pass("Quality Scores", message)
        } else if average >= SCORE_WARN_THRESHOLD {
            TestResult::warning("Quality Scores", message)
        } else {
            TestResult::fail("Quality Scores", message)
        };
        results.push(score_result.with_details(json!({
            "average": average,
            "sampled": sample.len(),
            "agent_threshold": agent.quality_threshold,
        })));

        Ok(results)
    }

    /// Run the canned battery and roll everything into an aggregate report.
    pub async fn generate_report(&self, agent_id: AgentId) -> AgentTestReport {
        let keywords: Vec<String> = REPORT_KEYWORDS.iter().map(|k| k.to_string()).collect();
        let mut results = self.test_generation(agent_id, &keywords).await;

        let prompts = match self.service.list_prompts(agent_id, REPORT_SAMPLE).await {
            Ok(prompts) => prompts,
            Err(e) => {
                warn!("Could not fetch prompts for metric evaluation: {}", e);
                Vec::new()
            }
        };

        let average_metrics = average_metrics(&prompts);
        let mut recommendations = Vec::new();

        results.push(check_duplicates(&prompts, &mut recommendations));

        if let Some(metrics) = &average_metrics {
            if metrics.overall < RECOMMEND_BELOW {
                recommendations.push(
                    "Overall quality is below target; review the agent's generation settings and prompt templates"
                        .to_string(),
                );
            }
            if metrics.clarity < RECOMMEND_BELOW {
                recommendations.push(
                    "Improve clarity: generated items should carry a name, a description, longer prompt text, and tags"
                        .to_string(),
                );
            }
            if metrics.usefulness < RECOMMEND_BELOW {
                recommendations.push(
                    "Improve usefulness: include use cases, an example output, and more substantial prompt text"
                        .to_string(),
                );
            }
            if metrics.seo_optimization < RECOMMEND_BELOW {
                recommendations.push(
                    "Improve SEO: place the keyword in names and descriptions and attach at least three tags"
                        .to_string(),
                );
            }
        }

        let (passed, failed, warnings) = AgentTestReport::tally(&results);

        AgentTestReport {
            agent_id,
            results,
            passed,
            failed,
            warnings,
            average_metrics,
            recommendations,
            generated_at: chrono::Utc::now(),
        }
    }
}

/// Duplicate-topic check over the evaluation sample.
fn check_duplicates(prompts: &[AgentPrompt], recommendations: &mut Vec<String>) -> TestResult {
    let titles: Vec<&str> = prompts
        .iter()
        .filter_map(|p| p.topic.as_deref())
        .filter(|t| !t.is_empty())
        .collect();

    if titles.is_empty() {
        return TestResult::pass("Duplicate Detection", "No duplicate topics detected");
    }

    let unique: HashSet<&str> = titles.iter().copied().collect();
    let rate = (titles.len() - unique.len()) as f64 / titles.len() as f64;
    let message = format!("Duplicate topic rate {:.1}%", rate * 100.0);
    let details = json!({
        "titles": titles.len(),
        "unique": unique.len(),
        "rate": rate,
    });

    if rate > DUPLICATE_WARN_RATE {
        recommendations.push(
            "Reduce duplicate topics by widening keyword input or deduplicating before storage"
                .to_string(),
        );
        TestResult::warning("Duplicate Detection", message).with_details(details)
    } else {
        TestResult::pass("Duplicate Detection", message).with_details(details)
    }
}

/// A prompt is complete when every field the pipeline relies on is present.
fn has_complete_metadata(prompt: &AgentPrompt) -> bool {
    present(prompt.topic.as_deref())
        && present(prompt.keyword.as_deref())
        && prompt.quality_score.is_some()
        && prompt.status.is_some()
        && present(prompt.raw_input.as_deref())
        && present(prompt.raw_output.as_deref())
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Per-dimension mean over the sample; `None` for an empty sample.
fn average_metrics(prompts: &[AgentPrompt]) -> Option<QualityMetrics> {
    if prompts.is_empty() {
        return None;
    }

    let count = prompts.len() as f64;
    let mut clarity = 0.0;
    let mut usefulness = 0.0;
    let mut uniqueness = 0.0;
    let mut seo = 0.0;
    for prompt in prompts {
        let metrics = evaluate_prompt_quality(prompt);
        clarity += metrics.clarity;
        usefulness += metrics.usefulness;
        uniqueness += metrics.uniqueness;
        seo += metrics.seo_optimization;
    }

    Some(QualityMetrics::from_components(
        clarity / count,
        usefulness / count,
        uniqueness / count,
        seo / count,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AgentServiceError, GenerateResponse};
    use async_trait::async_trait;
    use promptqa_core::{AgentDescriptor, PromptId, PromptStatus, TestStatus};

    /// In-memory stand-in for the agent service.
    struct FakeAgentService {
        agent: Option<AgentDescriptor>,
        generation_succeeds: bool,
        prompts: Vec<AgentPrompt>,
        fail_transport: bool,
    }

    impl FakeAgentService {
        fn with_agent(agent_id: AgentId) -> Self {
            Self {
                agent: Some(AgentDescriptor {
                    id: agent_id,
                    name: Some("test-agent".to_string()),
                    quality_threshold: Some(70.0),
                }),
                generation_succeeds: true,
                prompts: Vec::new(),
                fail_transport: false,
            }
        }
    }

    #[async_trait]
    impl AgentService for FakeAgentService {
        async fn fetch_agent(&self, _id: AgentId) -> Result<Option<AgentDescriptor>> {
            if self.fail_transport {
                return Err(AgentServiceError::Api {
                    status: 500,
                    message: "internal error".to_string(),
                });
            }
            Ok(self.agent.clone())
        }

        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
            Ok(GenerateResponse {
                success: self.generation_succeeds,
                generated: request.batch_size,
                error: if self.generation_succeeds {
                    None
                } else {
                    Some("model unavailable".to_string())
                },
                results: None,
            })
        }

        async fn list_prompts(
            &self,
            _agent_id: AgentId,
            limit: usize,
        ) -> Result<Vec<AgentPrompt>> {
            Ok(self.prompts.iter().take(limit).cloned().collect())
        }
    }

    fn stored_prompt(agent_id: AgentId, topic: &str, score: f64) -> AgentPrompt {
        AgentPrompt {
            id: PromptId::new(),
            agent_id,
            topic: Some(topic.to_string()),
            keyword: Some("seo".to_string()),
            raw_input: Some("generate a prompt".to_string()),
            raw_output: Some(
                r#"{"name":"SEO Writer","description":"Posts about seo","tags":["seo","blog","content"]}"#
                    .to_string(),
            ),
            quality_score: Some(score),
            status: Some(PromptStatus::Draft),
            metadata: serde_json::Value::Null,
            created_at: None,
        }
    }

    fn keywords() -> Vec<String> {
        vec!["photography".to_string(), "marketing".to_string()]
    }

    #[tokio::test]
    async fn test_missing_agent_fails_fast() {
        let agent_id = AgentId::new();
        let service = FakeAgentService {
            agent: None,
            ..FakeAgentService::with_agent(agent_id)
        };
        let harness = TestHarness::new(service);

        let results = harness.test_generation(agent_id, &keywords()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Agent Exists");
        assert_eq!(results[0].status, TestStatus::Fail);
    }

    #[tokio::test]
    async fn test_failed_generation_short_circuits() {
        let agent_id = AgentId::new();
        let service = FakeAgentService {
            generation_succeeds: false,
            ..FakeAgentService::with_agent(agent_id)
        };
        let harness = TestHarness::new(service);

        let results = harness.test_generation(agent_id, &keywords()).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].name, "Prompt Generation");
        assert_eq!(results[1].status, TestStatus::Fail);
        assert!(results[1].message.contains("model unavailable"));
    }

    #[tokio::test]
    async fn test_empty_storage_warns_and_skips_sampling() {
        let agent_id = AgentId::new();
        let service = FakeAgentService::with_agent(agent_id);
        let harness = TestHarness::new(service);

        let results = harness.test_generation(agent_id, &keywords()).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[2].name, "Prompt Storage");
        assert_eq!(results[2].status, TestStatus::Warning);
    }

    #[tokio::test]
    async fn test_full_battery_passes_with_good_prompts() {
        let agent_id = AgentId::new();
        let mut service = FakeAgentService::with_agent(agent_id);
        for i in 0..4 {
            service
                .prompts
                .push(stored_prompt(agent_id, &format!("topic {}", i), 80.0));
        }
        let harness = TestHarness::new(service);

        let results = harness.test_generation(agent_id, &keywords()).await;
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.status == TestStatus::Pass));

        let scores = &results[4];
        assert_eq!(scores.name, "Quality Scores");
        let details = scores.details.as_ref().unwrap();
        assert_eq!(details["agent_threshold"], 70.0);
    }

    #[tokio::test]
    async fn test_incomplete_metadata_warns() {
        let agent_id = AgentId::new();
        let mut service = FakeAgentService::with_agent(agent_id);
        service.prompts.push(stored_prompt(agent_id, "topic", 80.0));
        let mut incomplete = stored_prompt(agent_id, "other", 80.0);
        incomplete.raw_input = None;
        service.prompts.push(incomplete);
        let harness = TestHarness::new(service);

        let results = harness.test_generation(agent_id, &keywords()).await;
        let metadata = results.iter().find(|r| r.name == "Metadata Completeness").unwrap();
        assert_eq!(metadata.status, TestStatus::Warning);
        assert!(metadata.message.contains("1 of 2"));
    }

    #[tokio::test]
    async fn test_quality_score_bands() {
        let agent_id = AgentId::new();

        for (score, expected) in [
            (75.0, TestStatus::Pass),
            (60.0, TestStatus::Warning),
            (59.9, TestStatus::Fail),
        ] {
            let mut service = FakeAgentService::with_agent(agent_id);
            service.prompts.push(stored_prompt(agent_id, "topic", score));
            let harness = TestHarness::new(service);

            let results = harness.test_generation(agent_id, &keywords()).await;
            let check = results.iter().find(|r| r.name == "Quality Scores").unwrap();
            assert_eq!(check.status, expected, "score {}", score);
        }
    }

    #[tokio::test]
    async fn test_transport_error_collapses_to_single_failure() {
        let agent_id = AgentId::new();
        let service = FakeAgentService {
            fail_transport: true,
            ..FakeAgentService::with_agent(agent_id)
        };
        let harness = TestHarness::new(service);

        let results = harness.test_generation(agent_id, &keywords()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Test Execution");
        assert_eq!(results[0].status, TestStatus::Fail);
        assert!(results[0].message.contains("internal error"));
    }

    #[tokio::test]
    async fn test_report_duplicate_rate_at_threshold_does_not_warn() {
        let agent_id = AgentId::new();
        let mut service = FakeAgentService::with_agent(agent_id);
        // 6 prompts share one topic, 44 are unique: 50 titles, 45 unique,
        // rate exactly 10%.
        for _ in 0..6 {
            service.prompts.push(stored_prompt(agent_id, "repeated", 80.0));
        }
        for i in 0..44 {
            service
                .prompts
                .push(stored_prompt(agent_id, &format!("unique {}", i), 80.0));
        }
        let harness = TestHarness::new(service);

        let report = harness.generate_report(agent_id).await;
        let duplicates = report
            .results
            .iter()
            .find(|r| r.name == "Duplicate Detection")
            .unwrap();
        assert_eq!(duplicates.status, TestStatus::Pass);
        assert!(!report
            .recommendations
            .iter()
            .any(|r| r.contains("duplicate topics")));
    }

    #[tokio::test]
    async fn test_report_duplicate_rate_above_threshold_warns() {
        let agent_id = AgentId::new();
        let mut service = FakeAgentService::with_agent(agent_id);
        for _ in 0..7 {
            service.prompts.push(stored_prompt(agent_id, "repeated", 80.0));
        }
        for i in 0..43 {
            service
                .prompts
                .push(stored_prompt(agent_id, &format!("unique {}", i), 80.0));
        }
        let harness = TestHarness::new(service);

        let report = harness.generate_report(agent_id).await;
        let duplicates = report
            .results
            .iter()
            .find(|r| r.name == "Duplicate Detection")
            .unwrap();
        assert_eq!(duplicates.status, TestStatus::Warning);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("duplicate topics")));
    }

    #[tokio::test]
    async fn test_report_recommendations_compound() {
        let agent_id = AgentId::new();
        let mut service = FakeAgentService::with_agent(agent_id);
        // Sparse payloads: low on every dimension except uniqueness.
        let mut sparse = stored_prompt(agent_id, "topic", 40.0);
        sparse.raw_output = Some("{}".to_string());
        service.prompts.push(sparse);
        let harness = TestHarness::new(service);

        let report = harness.generate_report(agent_id).await;
        let metrics = report.average_metrics.unwrap();
        assert!(metrics.overall < 70.0);
        // Overall, clarity, usefulness, and SEO each trigger independently.
        assert_eq!(report.recommendations.len(), 4);
    }

    #[tokio::test]
    async fn test_report_totals_match_result_list() {
        let agent_id = AgentId::new();
        let mut service = FakeAgentService::with_agent(agent_id);
        for i in 0..3 {
            service
                .prompts
                .push(stored_prompt(agent_id, &format!("topic {}", i), 80.0));
        }
        let harness = TestHarness::new(service);

        let report = harness.generate_report(agent_id).await;
        let (passed, failed, warnings) = AgentTestReport::tally(&report.results);
        assert_eq!(report.passed, passed);
        assert_eq!(report.failed, failed);
        assert_eq!(report.warnings, warnings);
        assert_eq!(
            report.passed + report.failed + report.warnings,
            report.results.len()
        );
    }

    #[tokio::test]
    async fn test_report_without_prompts_has_no_average_metrics() {
        let agent_id = AgentId::new();
        let service = FakeAgentService::with_agent(agent_id);
        let harness = TestHarness::new(service);

        let report = harness.generate_report(agent_id).await;
        assert!(report.average_metrics.is_none());
        assert!(report.recommendations.is_empty());
    }
}
