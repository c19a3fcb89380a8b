//! Unit tests for the data models, pinning wire shapes and the terminal
//! status function.

use std::str::FromStr;

use super::*;

fn sample_step() -> Step {
    Step::move_file("m1", "/a.txt", "/Docs/a.txt").with_reason("group documents")
}

#[test]
fn test_step_serializes_with_wire_field_names() {
    let value = serde_json::to_value(sample_step()).unwrap();

    assert_eq!(value["ID"], "m1");
    assert_eq!(value["Source"], "/a.txt");
    assert_eq!(value["Destination"], "/Docs/a.txt");
    assert_eq!(value["Reason"], "group documents");
    assert_eq!(value["Type"], "FILE_MOVE");
    assert_eq!(value["FileCount"], 0);
}

#[test]
fn test_step_kind_wire_strings() {
    assert_eq!(StepKind::MoveFile.as_str(), "FILE_MOVE");
    assert_eq!(StepKind::MoveDir.as_str(), "FOLDER_MOVE");
    assert_eq!(StepKind::CreateDir.as_str(), "CREATE_FOLDER");

    for kind in ["FILE_MOVE", "FOLDER_MOVE", "CREATE_FOLDER"] {
        assert_eq!(StepKind::from_str(kind).unwrap().as_str(), kind);
    }
    assert!(StepKind::from_str("RENAME").is_err());
}

#[test]
fn test_plan_round_trips_through_json() {
    let plan = Plan::new(
        "plan-1",
        vec![
            Step::create_dir("m1", "/Docs"),
            Step::move_file("m2", "/a.txt", "/Docs/a.txt"),
        ],
    );

    let json = serde_json::to_string_pretty(&plan).unwrap();
    let decoded: Plan = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, plan);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["ID"], "plan-1");
    assert!(value["Moves"].as_array().is_some());
    assert!(value["Summary"].is_object());
    assert!(value["Rationale"].is_string());
}

#[test]
fn test_execution_status_wire_strings() {
    for (status, wire) in [
        (ExecutionStatus::InProgress, "IN_PROGRESS"),
        (ExecutionStatus::Completed, "COMPLETED"),
        (ExecutionStatus::Partial, "PARTIAL"),
        (ExecutionStatus::Failed, "FAILED"),
    ] {
        assert_eq!(status.as_str(), wire);
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            serde_json::Value::String(wire.to_string())
        );
        assert_eq!(ExecutionStatus::from_str(wire).unwrap(), status);
    }

    assert!(!ExecutionStatus::InProgress.is_terminal());
    assert!(ExecutionStatus::Partial.is_terminal());
}

#[test]
fn test_execution_log_wire_field_names() {
    let mut log = ExecutionLog::begin("plan-1");
    log.record_completed("m1");
    log.record_failed("m2", "disk full");
    log.record_skipped("m3", "destination already exists");

    let value = serde_json::to_value(&log).unwrap();
    assert_eq!(value["PlanID"], "plan-1");
    assert_eq!(value["Status"], "IN_PROGRESS");
    assert_eq!(value["Completed"][0]["MoveID"], "m1");
    assert_eq!(value["Failed"][0]["MoveID"], "m2");
    assert_eq!(value["Failed"][0]["Error"], "disk full");
    assert_eq!(value["Skipped"][0]["MoveID"], "m3");
    assert_eq!(value["Skipped"][0]["Reason"], "destination already exists");
}

#[test]
fn test_terminal_status_is_a_function_of_list_sizes() {
    // (completed, failed, skipped) -> expected status
    let table = [
        (0, 0, 0, ExecutionStatus::Completed),
        (2, 0, 0, ExecutionStatus::Completed),
        (1, 1, 0, ExecutionStatus::Partial),
        (0, 1, 0, ExecutionStatus::Failed),
        (0, 2, 1, ExecutionStatus::Failed),
        (1, 1, 1, ExecutionStatus::Partial),
        (0, 0, 3, ExecutionStatus::Partial),
        (2, 0, 1, ExecutionStatus::Partial),
    ];

    for (completed, failed, skipped, expected) in table {
        let mut log = ExecutionLog::begin("p");
        for i in 0..completed {
            log.record_completed(format!("c{i}"));
        }
        for i in 0..failed {
            log.record_failed(format!("f{i}"), "boom");
        }
        for i in 0..skipped {
            log.record_skipped(format!("s{i}"), "drift");
        }

        assert_eq!(
            log.terminal_status(),
            expected,
            "completed={completed} failed={failed} skipped={skipped}"
        );

        log.finalize();
        assert_eq!(log.status, expected);
    }
}

#[test]
fn test_operation_payload_round_trip() {
    let step = sample_step();
    let op = Operation::for_step("plan-1", &step).unwrap();

    assert_eq!(op.id, "plan-1-m1");
    assert_eq!(op.kind, STEP_OPERATION_KIND);
    assert_eq!(op.decode_step().unwrap(), step);

    // Payload crosses the wire as a base64 string, not a byte array.
    let value = serde_json::to_value(&op).unwrap();
    assert!(value["Data"].is_string());
    let decoded: Operation = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, op);
}

#[test]
fn test_completion_marker_shape() {
    let marker = Operation::completion_marker("plan-1-m1");
    assert_eq!(marker.id, "plan-1-m1_completed");
    assert_eq!(marker.kind, COMPLETION_MARKER_KIND);
    assert!(marker.data.is_empty());
    assert!(marker.is_completion_marker());

    assert_eq!(
        operation::base_operation_id(&marker.id),
        Some("plan-1-m1")
    );
    assert_eq!(operation::base_operation_id("plan-1-m1"), None);

    // Markers with an absent Data field must still decode.
    let bare: Operation = serde_json::from_str(
        r#"{"ID":"x_completed","Type":"completion_marker","Timestamp":"2024-01-01T00:00:00Z"}"#,
    )
    .unwrap();
    assert!(bare.data.is_empty());
}

#[test]
fn test_plan_summary_status_label() {
    let plan = Plan::new("p", vec![sample_step()]);

    let pending = PlanSummary::from_plan(&plan, None);
    assert_eq!(pending.status_label(), "pending");
    assert_eq!(pending.move_count, 1);

    let done = PlanSummary::from_plan(&plan, Some(ExecutionStatus::Completed));
    assert_eq!(done.status_label(), "COMPLETED");
}
