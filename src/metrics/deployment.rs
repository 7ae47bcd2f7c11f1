use crate::models::{Build, Status};
use crate::repository::BuildRepository;

/// Count effective deployments for a pipeline over a closed time window.
///
/// Resolves the pipeline's builds through the repository and delegates to
/// [`count_effective_deployments`]. An unknown pipeline resolves to an empty
/// build list and therefore a count of zero.
pub fn deployment_count(
    repository: &dyn BuildRepository,
    pipeline_id: &str,
    target_stage: &str,
    start_time: i64,
    end_time: i64,
) -> usize {
    let builds = repository.get_all_builds(pipeline_id);
    count_effective_deployments(&builds, target_stage, start_time, end_time)
}

/// Count distinct effective deployments within `[start_time, end_time]`.
///
/// A build participates when its start timestamp lies inside the window (both
/// bounds inclusive) and it ran the target stage to `SUCCESS`. Builds missing
/// that stage, or where the stage finished in any other status, are excluded
/// rather than treated as errors.
///
/// Surviving builds are ordered ascending by start timestamp (stable, so
/// equal timestamps keep their input order) and consecutive builds deploying
/// the same commit collapse into one deployment: re-deploying an unchanged
/// revision is not a new deployment event. Deduplication only ever compares
/// builds inside the window; history outside it does not participate.
///
/// # Arguments
///
/// * `builds` - Build snapshot for one pipeline, in no particular order
/// * `target_stage` - Stage name identifying the deployment step, matched
///   case-sensitively
/// * `start_time` - Window start, epoch seconds, inclusive
/// * `end_time` - Window end, epoch seconds, inclusive
///
/// # Returns
///
/// Number of effective deployments. Empty input, an inverted window, or no
/// matching builds all yield zero.
pub fn count_effective_deployments(
    builds: &[Build],
    target_stage: &str,
    start_time: i64,
    end_time: i64,
) -> usize {
    let mut deployments: Vec<&Build> = builds
        .iter()
        .filter(|build| {
            build.start_timestamp >= start_time && build.start_timestamp <= end_time
        })
        .filter(|build| {
            build
                .stage(target_stage)
                .is_some_and(|stage| stage.status == Status::Success)
        })
        .collect();

    // sort_by_key is stable: ties keep original list order
    deployments.sort_by_key(|build| build.start_timestamp);

    let mut count = 0;
    let mut previous_commit: Option<&str> = None;
    for build in deployments {
        if previous_commit != Some(build.commit_id.as_str()) {
            count += 1;
        }
        previous_commit = Some(build.commit_id.as_str());
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stage;
    use crate::repository::InMemoryBuildRepository;

    const TARGET_STAGE: &str = "deploy to prod";

    // 2021-01-01 / 2021-01-15 / 2021-01-30 / 2021-12-01
    const JAN_01: i64 = 1609459200;
    const JAN_15: i64 = 1610668800;
    const JAN_30: i64 = 1611964800;
    const DEC_01: i64 = 1638316800;

    // Window bounds: 2021-01-10 / 2021-01-20 / 2020-12-30 / 2021-02-01
    const JAN_10: i64 = 1610236800;
    const JAN_20: i64 = 1611100800;
    const DEC_30_2020: i64 = 1609286400;
    const FEB_01: i64 = 1612137600;

    fn stage(name: &str, status: Status) -> Stage {
        Stage {
            name: name.to_string(),
            status,
            start_time_millis: 0,
            duration_millis: 0,
        }
    }

    fn build(start_timestamp: i64, commit_id: &str, stages: Vec<Stage>) -> Build {
        Build {
            pipeline_id: "test pipeline - master".to_string(),
            number: 0,
            result: Status::Success,
            start_timestamp,
            duration_millis: 0,
            url: String::new(),
            commit_id: commit_id.to_string(),
            stages,
        }
    }

    fn deploy_build(start_timestamp: i64, commit_id: &str, status: Status) -> Build {
        build(start_timestamp, commit_id, vec![stage(TARGET_STAGE, status)])
    }

    mod count_effective_deployments {
        use super::*;

        #[test]
        fn counts_single_build_inside_window() {
            let builds = vec![
                deploy_build(JAN_01, "a", Status::Success),
                deploy_build(JAN_15, "b", Status::Success),
                deploy_build(JAN_30, "c", Status::Success),
            ];

            let count = count_effective_deployments(&builds, TARGET_STAGE, JAN_10, JAN_20);
            assert_eq!(count, 1);
        }

        #[test]
        fn counts_only_builds_with_successful_target_stage() {
            let builds = vec![
                deploy_build(JAN_01, "a", Status::Failed),
                deploy_build(JAN_15, "b", Status::Success),
                deploy_build(JAN_30, "c", Status::Success),
            ];

            let count = count_effective_deployments(&builds, TARGET_STAGE, DEC_30_2020, FEB_01);
            assert_eq!(count, 2);
        }

        #[test]
        fn ignores_statuses_of_other_stages() {
            let builds = vec![
                build(
                    JAN_01,
                    "a",
                    vec![
                        stage("build", Status::Success),
                        stage(TARGET_STAGE, Status::Success),
                    ],
                ),
                build(
                    JAN_15,
                    "b",
                    vec![
                        stage("build", Status::Success),
                        stage(TARGET_STAGE, Status::Failed),
                    ],
                ),
                build(
                    JAN_30,
                    "c",
                    vec![
                        stage("build", Status::Failed),
                        stage(TARGET_STAGE, Status::Success),
                    ],
                ),
            ];

            let count = count_effective_deployments(&builds, TARGET_STAGE, DEC_30_2020, FEB_01);
            assert_eq!(count, 2);
        }

        #[test]
        fn collapses_consecutive_deployments_of_same_commit() {
            let builds = vec![
                deploy_build(DEC_01, "0", Status::Success),
                deploy_build(JAN_01, "1", Status::Success),
                deploy_build(JAN_15, "1", Status::Success),
                deploy_build(JAN_30, "2", Status::Success),
            ];

            let count = count_effective_deployments(&builds, TARGET_STAGE, DEC_30_2020, FEB_01);
            assert_eq!(count, 2);
        }

        #[test]
        fn returns_zero_for_empty_input() {
            let count = count_effective_deployments(&[], TARGET_STAGE, JAN_10, JAN_20);
            assert_eq!(count, 0);
        }

        #[test]
        fn returns_zero_for_inverted_window() {
            let builds = vec![deploy_build(JAN_15, "a", Status::Success)];

            let count = count_effective_deployments(&builds, TARGET_STAGE, JAN_20, JAN_10);
            assert_eq!(count, 0);
        }

        #[test]
        fn window_bounds_are_inclusive() {
            let builds = vec![
                deploy_build(JAN_10, "a", Status::Success),
                deploy_build(JAN_20, "b", Status::Success),
            ];

            let count = count_effective_deployments(&builds, TARGET_STAGE, JAN_10, JAN_20);
            assert_eq!(count, 2);
        }

        #[test]
        fn excludes_builds_missing_the_target_stage() {
            let builds = vec![
                build(JAN_15, "a", vec![stage("build", Status::Success)]),
                build(JAN_15 + 60, "b", vec![]),
            ];

            let count = count_effective_deployments(&builds, TARGET_STAGE, JAN_10, JAN_20);
            assert_eq!(count, 0);
        }

        #[test]
        fn excludes_non_success_stage_statuses() {
            let builds = vec![
                deploy_build(JAN_15, "a", Status::Aborted),
                deploy_build(JAN_15 + 60, "b", Status::InProgress),
                deploy_build(JAN_15 + 120, "c", Status::Other),
            ];

            let count = count_effective_deployments(&builds, TARGET_STAGE, JAN_10, JAN_20);
            assert_eq!(count, 0);
        }

        #[test]
        fn does_not_depend_on_input_order() {
            let builds = vec![
                deploy_build(JAN_30, "2", Status::Success),
                deploy_build(JAN_15, "1", Status::Success),
                deploy_build(JAN_01, "1", Status::Success),
            ];

            let count = count_effective_deployments(&builds, TARGET_STAGE, DEC_30_2020, FEB_01);
            assert_eq!(count, 2);
        }

        #[test]
        fn breaks_timestamp_ties_by_input_order() {
            // Same timestamp: input order decides adjacency, so the repeated
            // commit "a" stays adjacent and collapses
            let builds = vec![
                deploy_build(JAN_15, "a", Status::Success),
                deploy_build(JAN_15, "a", Status::Success),
                deploy_build(JAN_15, "b", Status::Success),
            ];

            let count = count_effective_deployments(&builds, TARGET_STAGE, JAN_10, JAN_20);
            assert_eq!(count, 2);
        }

        #[test]
        fn dedup_ignores_builds_outside_the_window() {
            // The in-window build repeats a commit deployed just before the
            // window; it still counts because out-of-window history never
            // joins the comparison
            let builds = vec![
                deploy_build(JAN_10 - 60, "a", Status::Success),
                deploy_build(JAN_15, "a", Status::Success),
            ];

            let count = count_effective_deployments(&builds, TARGET_STAGE, JAN_10, JAN_20);
            assert_eq!(count, 1);
        }

        #[test]
        fn same_commit_counts_again_after_an_intervening_commit() {
            let builds = vec![
                deploy_build(JAN_01, "a", Status::Success),
                deploy_build(JAN_15, "b", Status::Success),
                deploy_build(JAN_30, "a", Status::Success),
            ];

            let count = count_effective_deployments(&builds, TARGET_STAGE, DEC_30_2020, FEB_01);
            assert_eq!(count, 3);
        }

        #[test]
        fn never_exceeds_number_of_surviving_builds() {
            let builds = vec![
                deploy_build(JAN_01, "a", Status::Success),
                deploy_build(JAN_15, "a", Status::Success),
                deploy_build(JAN_30, "b", Status::Failed),
            ];

            let surviving = 2;
            let count = count_effective_deployments(&builds, TARGET_STAGE, DEC_30_2020, FEB_01);
            assert!(count <= surviving);
        }

        #[test]
        fn repeated_calls_return_identical_results() {
            let builds = vec![
                deploy_build(JAN_01, "a", Status::Success),
                deploy_build(JAN_15, "b", Status::Success),
            ];

            let first = count_effective_deployments(&builds, TARGET_STAGE, DEC_30_2020, FEB_01);
            let second = count_effective_deployments(&builds, TARGET_STAGE, DEC_30_2020, FEB_01);
            assert_eq!(first, second);
        }
    }

    mod deployment_count {
        use super::*;

        #[test]
        fn resolves_builds_through_the_repository() {
            let repository = InMemoryBuildRepository::new();
            repository.save_builds(
                "test pipeline - master",
                vec![
                    deploy_build(JAN_01, "a", Status::Success),
                    deploy_build(JAN_15, "b", Status::Success),
                    deploy_build(JAN_30, "c", Status::Success),
                ],
            );

            let count = deployment_count(
                &repository,
                "test pipeline - master",
                TARGET_STAGE,
                JAN_10,
                JAN_20,
            );
            assert_eq!(count, 1);
        }

        #[test]
        fn unknown_pipeline_yields_zero() {
            let repository = InMemoryBuildRepository::new();

            let count = deployment_count(&repository, "missing", TARGET_STAGE, JAN_10, JAN_20);
            assert_eq!(count, 0);
        }
    }
}
