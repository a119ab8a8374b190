use indexmap::{IndexMap, IndexSet};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use provmap_codec::{Decimal, Duration, HeaderBlock, RawJson};
use provmap_codec::CodecError;
use provmap_mapper::{
    copy_in, copy_out, mirror, primary_key, record, Identity, MapErrorKind, Mapper, MapperConfig,
    TriState,
};
use provmap_test_utils::{
    sample_check_model, sample_check_plain, sample_schedule_model, AlertChannel, AlertChannelState,
    CheckModel, CheckPlain, ComponentDraft, ComponentModel, ComponentPlain, ScheduleModel,
    SchedulePlain,
};

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct WebhookModel {
        url: TriState<String>,
        #[map(extra = HeaderBlock)]
        request_headers: TriState<IndexMap<String, Vec<String>>>,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct WebhookPlain {
        url: String,
        #[map(extra = HeaderBlock)]
        request_headers: String,
    }
}

fn paths(err: &provmap_mapper::MappingError) -> Vec<String> {
    err.iter().map(|e| e.path().to_string()).collect()
}

#[test]
fn test_copy_in_full_check() {
    let mut model = CheckModel::default();
    copy_in(&mut model, &sample_check_plain()).unwrap();

    assert_eq!(model.id, TriState::Known(42));
    assert_eq!(model.name, TriState::known("api".to_string()));
    assert_eq!(model.frequency, TriState::Known(Duration::from_secs(5_400)));
    assert_eq!(model.paused, TriState::Known(false));
    assert_eq!(model.threshold, TriState::Known("0.95".parse::<Decimal>().unwrap()));
    assert_eq!(
        model.tags,
        TriState::Known(IndexSet::from(["prod".to_string(), "edge".to_string()]))
    );
    assert_eq!(
        model.labels.as_known().and_then(|l| l.get("env")).map(String::as_str),
        Some("prod")
    );
    assert_eq!(model.body, TriState::Known(RawJson::new("{\"a\": \"b\"}").unwrap()));
}

#[test]
fn test_copy_in_absent_optional_is_null() {
    let mut model = CheckModel {
        description: TriState::Unknown,
        ..CheckModel::default()
    };
    copy_in(&mut model, &sample_check_plain()).unwrap();
    assert_eq!(model.description, TriState::Null);
}

#[test]
fn test_copy_in_nested_schedule() {
    let mut model = CheckModel::default();
    copy_in(&mut model, &sample_check_plain()).unwrap();

    let schedule = model.schedule.into_known().unwrap();
    assert_eq!(schedule.len(), 2);
    assert_eq!(
        schedule[0],
        ScheduleModel {
            weekdays: TriState::Known(IndexSet::from(["mon".to_string(), "tue".to_string()])),
            start: TriState::known("09:00".to_string()),
            timeout: TriState::Known(Duration::from_secs(30)),
        }
    );
    assert_eq!(schedule[1].timeout, TriState::Null);
}

#[test]
fn test_copy_in_header_block_handler() {
    let mut model = CheckModel::default();
    copy_in(&mut model, &sample_check_plain()).unwrap();

    let headers = model.request_headers.into_known().unwrap();
    assert_eq!(headers.get_all("Foo"), ["Bar".to_string(), "Baz".to_string()]);
    assert_eq!(headers.get_all("Qux"), ["Quux".to_string()]);
    assert_eq!(headers.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec!["Foo", "Qux"]);
}

#[test]
fn test_copy_in_empty_header_block() {
    let plain = CheckPlain {
        request_headers: String::new(),
        ..sample_check_plain()
    };
    let mut model = CheckModel::default();
    copy_in(&mut model, &plain).unwrap();
    assert_eq!(model.request_headers, TriState::Known(HeaderBlock::new()));
}

#[test]
fn test_copy_out_header_map_to_text() {
    let model = WebhookModel {
        url: TriState::known("https://hooks.example.com".to_string()),
        request_headers: TriState::known(IndexMap::from([
            ("Accept".to_string(), vec!["*/*".to_string()]),
            ("X-Team".to_string(), vec!["sre".to_string(), "ops".to_string()]),
        ])),
    };
    let mut plain = WebhookPlain::default();
    copy_out(&mut plain, &model).unwrap();
    assert_eq!(plain.request_headers, "Accept: */*\r\nX-Team: sre\r\nX-Team: ops\r\n");

    let mut back = WebhookModel::default();
    copy_in(&mut back, &plain).unwrap();
    assert_eq!(back, model);
}

#[test]
fn test_copy_out_rejects_header_line_injection() {
    let model = WebhookModel {
        url: TriState::known("https://hooks.example.com".to_string()),
        request_headers: TriState::known(IndexMap::from([
            ("Accept".to_string(), vec!["*/*".to_string()]),
            ("X-Note".to_string(), vec!["hi\r\nAuthorization: stolen".to_string()]),
            ("X-Pad".to_string(), vec!["  leading".to_string()]),
        ])),
    };
    let mut plain = WebhookPlain::default();
    let err = copy_out(&mut plain, &model).unwrap_err();

    assert_eq!(
        paths(&err),
        vec!["request_headers[\"X-Note\"]", "request_headers[\"X-Pad\"]"]
    );
    assert!(err.iter().all(|e| matches!(
        e.kind(),
        MapErrorKind::Codec(CodecError::InvalidHeaderLine { .. })
    )));
    assert_eq!(plain, WebhookPlain::default());
}

#[test]
fn test_copy_out_full_check() {
    let mut plain = CheckPlain::default();
    copy_out(&mut plain, &sample_check_model()).unwrap();

    assert_eq!(
        plain,
        CheckPlain {
            check_id: None,
            name: "api".to_string(),
            url: "https://example.com/health".to_string(),
            frequency: "1m0s".to_string(),
            paused: true,
            description: None,
            threshold: None,
            tags: vec!["prod".to_string()],
            labels: [("team".to_string(), "sre".to_string())].into_iter().collect(),
            schedule: vec![SchedulePlain {
                weekdays: vec!["mon".to_string()],
                start: "08:00".to_string(),
                timeout: None,
            }],
            request_headers: "Destination: Eschaton\r\n".to_string(),
            body: None,
        }
    );
}

#[test]
fn test_copy_out_unknown_identity_keeps_destination_id() {
    let mut plain = CheckPlain {
        check_id: Some(7),
        ..CheckPlain::default()
    };
    copy_out(&mut plain, &sample_check_model()).unwrap();
    assert_eq!(plain.check_id, Some(7));
}

#[test]
fn test_null_into_required_fails() {
    let model = CheckModel {
        name: TriState::Null,
        ..sample_check_model()
    };
    let mut plain = CheckPlain::default();
    let err = copy_out(&mut plain, &model).unwrap_err();

    assert_eq!(err.len(), 1);
    assert_eq!(paths(&err), vec!["name"]);
    assert_eq!(
        err.first().map(|e| e.kind()),
        Some(&MapErrorKind::CannotAssignNullToRequiredField)
    );
}

#[test]
fn test_null_into_optional_is_absent() {
    let model = CheckModel {
        description: TriState::Null,
        ..sample_check_model()
    };
    let mut plain = CheckPlain {
        description: Some("stale".to_string()),
        ..CheckPlain::default()
    };
    copy_out(&mut plain, &model).unwrap();
    assert_eq!(plain.description, None);
}

#[test]
fn test_unknown_rejected_without_partial_mutation() {
    let model = CheckModel {
        url: TriState::Unknown,
        paused: TriState::Unknown,
        ..sample_check_model()
    };
    let before = sample_check_plain();
    let mut plain = before.clone();

    let err = copy_out(&mut plain, &model).unwrap_err();
    assert_eq!(paths(&err), vec!["url", "paused"]);
    assert!(err.iter().all(|e| e.kind() == &MapErrorKind::CannotSendUnknownValue));
    assert_eq!(plain, before);
}

#[test]
fn test_nested_breadcrumbs() {
    let mut schedule = vec![
        sample_schedule_model(&["mon"], "08:00"),
        sample_schedule_model(&["tue"], "08:00"),
        sample_schedule_model(&["wed"], "08:00"),
    ];
    schedule[2].weekdays = TriState::Unknown;
    schedule[1].start = TriState::Null;
    let model = CheckModel {
        schedule: TriState::Known(schedule),
        ..sample_check_model()
    };

    let mut plain = CheckPlain::default();
    let err = copy_out(&mut plain, &model).unwrap_err();
    assert_eq!(paths(&err), vec!["schedule[1].start", "schedule[2].weekdays"]);
    assert!(err
        .to_string()
        .contains("schedule[2].weekdays: cannot send unknown value"));
}

#[test]
fn test_codec_error_carries_path() {
    let plain = CheckPlain {
        frequency: "1d".to_string(),
        ..sample_check_plain()
    };
    let mut model = CheckModel::default();
    let err = copy_in(&mut model, &plain).unwrap_err();

    assert_eq!(paths(&err), vec!["frequency"]);
    assert!(err.to_string().contains("unknown unit \"d\""));
    assert_eq!(model, CheckModel::default());
}

#[test]
fn test_mirror_identity_number_to_text() {
    let channel = AlertChannel {
        id: 10,
        kind: "email".to_string(),
        target: "ops@example.com".to_string(),
    };
    let mut state = AlertChannelState::default();
    mirror(&mut state, &channel).unwrap();
    assert_eq!(
        state,
        AlertChannelState {
            channel_id: "10".to_string(),
            kind: "email".to_string(),
            target: "ops@example.com".to_string(),
        }
    );

    let mut back = AlertChannel::default();
    mirror(&mut back, &state).unwrap();
    assert_eq!(back, channel);
    assert_eq!(primary_key(&back), Identity::new(10));
}

#[test]
fn test_mirror_rejects_non_numeric_identity() {
    let state = AlertChannelState {
        channel_id: "ten".to_string(),
        ..AlertChannelState::default()
    };
    let mut channel = AlertChannel::default();
    let err = mirror(&mut channel, &state).unwrap_err();
    assert_eq!(paths(&err), vec!["id"]);
    assert_eq!(
        err.first().map(|e| e.kind()),
        Some(&MapErrorKind::mismatch("string", "int"))
    );
}

#[test]
fn test_missing_primary_key() {
    let draft = ComponentDraft {
        page_id: 3,
        name: "API".to_string(),
        status: "operational".to_string(),
    };
    let mut model = ComponentModel::default();
    let err = copy_in(&mut model, &draft).unwrap_err();

    assert_eq!(
        err.first().map(|e| e.kind()),
        Some(&MapErrorKind::MissingPrimaryKeyField {
            record: "ComponentDraft",
            field: "id",
        })
    );
    assert_eq!(model, ComponentModel::default());
}

#[test]
fn test_parent_id_is_plain_field() {
    let plain = ComponentPlain {
        id: 5,
        page_id: 3,
        name: "API".to_string(),
        status: "operational".to_string(),
    };
    let mut model = ComponentModel::default();
    copy_in(&mut model, &plain).unwrap();
    assert_eq!(model.page_id, TriState::Known(3));

    let mut draft = ComponentDraft::default();
    mirror(&mut draft, &plain).unwrap();
    assert_eq!(draft.page_id, 3);
    assert_eq!(primary_key(&plain), Identity::new(5));
}

#[test]
fn test_fail_fast_and_error_cap() {
    let model = CheckModel {
        name: TriState::Unknown,
        url: TriState::Unknown,
        paused: TriState::Unknown,
        ..sample_check_model()
    };

    let mut plain = CheckPlain::default();
    let err = Mapper::global().copy_out(&mut plain, &model).unwrap_err();
    assert_eq!(err.len(), 3);

    let capped = Mapper::new(MapperConfig::default().with_max_errors(2));
    assert_eq!(capped.copy_out(&mut plain, &model).unwrap_err().len(), 2);

    let fast = Mapper::new(MapperConfig::default().with_fail_fast(true));
    let err = fast.copy_out(&mut plain, &model).unwrap_err();
    assert_eq!(paths(&err), vec!["name"]);
    assert_eq!(plain, CheckPlain::default());
}

#[test]
fn test_round_trip_plain_model_plain() {
    let plain = sample_check_plain();
    let mut model = CheckModel::default();
    copy_in(&mut model, &plain).unwrap();

    let mut back = CheckPlain::default();
    copy_out(&mut back, &model).unwrap();

    assert_eq!(back.check_id, Some(42));
    assert_eq!(back.frequency, "1h30m0s");
    assert_eq!(back.threshold.as_deref(), Some("0.95"));
    assert_eq!(back.request_headers, plain.request_headers);
    assert_eq!(back.schedule, plain.schedule);
    assert_eq!(back.body, plain.body);
}

proptest! {
    #[test]
    fn prop_component_round_trip(
        id in any::<i64>(),
        page_id in any::<i64>(),
        name in "[a-zA-Z ]{0,16}",
        status in "(operational|degraded|outage)",
    ) {
        let plain = ComponentPlain { id, page_id, name, status };
        let mut model = ComponentModel::default();
        copy_in(&mut model, &plain).unwrap();

        let mut back = ComponentPlain::default();
        copy_out(&mut back, &model).unwrap();
        prop_assert_eq!(back, plain);
    }

    #[test]
    fn prop_mirror_identity_round_trip(id in any::<i64>()) {
        let channel = AlertChannel { id, ..AlertChannel::default() };
        let mut state = AlertChannelState::default();
        mirror(&mut state, &channel).unwrap();
        prop_assert_eq!(&state.channel_id, &id.to_string());

        let mut back = AlertChannel::default();
        mirror(&mut back, &state).unwrap();
        prop_assert_eq!(back.id, id);
    }
}
