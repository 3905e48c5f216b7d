use survey_spec::{
    AnswerStore, QuestionView, RenderStatus, Survey, build_render_payload, render_json_ui,
    answers_schema, render_text, survey_schema, validate,
};

fn survey() -> Survey {
    serde_json::from_str(include_str!("../tests/fixtures/multi_choice.json")).expect("deserialize")
}

#[test]
fn render_text_lists_questions_and_hints() {
    let survey = survey();
    let store = AnswerStore::for_survey(&survey).expect("store");
    let views = QuestionView::for_survey(&survey, &store, 200).expect("views");
    let payload = build_render_payload(&survey, &views, "nameless", &[]);

    assert_eq!(payload.status, RenderStatus::NeedInput);
    let text = render_text(&payload);
    assert!(text.contains("Your username for this survey: nameless"));
    assert!(text.contains("Minimum of 2 answers required."));
    assert!(text.contains("Maximum of 3 answers allowed."));
    assert!(text.contains("[ ] 1. Reading"));
}

#[test]
fn render_json_ui_exposes_selection_and_errors() {
    let survey = survey();
    let mut store = AnswerStore::for_survey(&survey).expect("store");
    let mut views = QuestionView::for_survey(&survey, &store, 200).expect("views");
    if let QuestionView::Closed(state) = &mut views[0] {
        state.set_checked(201, true, &mut store).expect("check");
    }
    let errors = validate(&survey.questions, store.answers());
    let payload = build_render_payload(&survey, &views, "ada", &errors);

    let ui = render_json_ui(&payload);
    assert_eq!(ui["status"], "error");
    assert_eq!(ui["progress"]["answered"], 1);
    assert_eq!(ui["progress"]["total"], 2);
    assert_eq!(ui["errors"][0], "Question 1 require 2 answers, 1 were given");
    let question = &ui["questions"][0];
    assert_eq!(question["control"], "checkbox");
    assert_eq!(question["choices"][1]["selected"], true);
    assert_eq!(question["error"], true);
    assert_eq!(ui["questions"][1]["control"], "textarea");
    assert_eq!(ui["questions"][1]["value"], "");
}

#[test]
fn complete_form_reports_complete_status() {
    let survey = survey();
    let mut store = AnswerStore::for_survey(&survey).expect("store");
    let mut views = QuestionView::for_survey(&survey, &store, 200).expect("views");
    if let QuestionView::Closed(state) = &mut views[0] {
        state.set_checked(200, true, &mut store).expect("check");
        state.set_checked(202, true, &mut store).expect("check");
    }
    let payload = build_render_payload(&survey, &views, "ada", &[]);
    assert_eq!(payload.status, RenderStatus::Complete);
}

#[test]
fn schema_describes_questions() {
    let schema = survey_schema();
    let text = schema.to_string();
    assert!(text.contains("questions"));
    assert!(text.contains("answers"));
}

#[test]
fn answers_schema_describes_submissions() {
    let schema = answers_schema();
    assert!(schema["properties"]["survey_id"].is_object());
    assert!(schema["properties"]["username"].is_object());
    let answers = &schema["properties"]["answers"];
    assert_eq!(answers["type"], "array");
    let text = schema.to_string();
    assert!(text.contains("UserAnswer"));
    assert!(text.contains("AnswerValue"));
}
