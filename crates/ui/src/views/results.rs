use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{GradedQuestionVm, LEGEND, ResultsVm, map_results};

#[component]
pub fn ResultsView() -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.take_test();

    let resource = use_resource(move || {
        let service = service.clone();
        async move {
            let report = service
                .last_report()
                .await
                .map_err(|err| {
                    tracing::warn!(error = %err, "failed to load cached result");
                    ViewError::Unknown
                })?
                .ok_or(ViewError::MissingResult)?;
            Ok::<_, ViewError>(map_results(&report))
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page results",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(vm) => rsx! {
                    ResultsPage { vm }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    Link { to: Route::Home {}, "Back to Home" }
                },
            }
        }
    }
}

#[component]
pub fn ResultsPage(vm: ResultsVm) -> Element {
    rsx! {
        div { class: "result-header",
            div { class: "result-summary",
                h2 { "{vm.title}" }
                p { class: "score",
                    "Score: "
                    span { class: vm.score_class, "{vm.score}" }
                }
                p { class: "time-taken", "Time Taken: {vm.time_taken}" }
            }
            AnswerLegend {}
        }
        for question in vm.questions.clone() {
            GradedQuestion { question }
        }
        p { class: "back",
            Link {
                to: Route::CourseTests { course_id: vm.course_id.clone() },
                "Back to Course Details"
            }
        }
    }
}

#[component]
pub fn AnswerLegend() -> Element {
    rsx! {
        div { class: "legend",
            for (class, label) in LEGEND {
                span { class, "{label}" }
            }
        }
    }
}

#[component]
fn GradedQuestion(question: GradedQuestionVm) -> Element {
    rsx! {
        div { class: "question",
            div { class: "question-header",
                label { class: "question-text", "{question.label}" }
                span { class: "points", "Points: {question.weight}" }
                span { class: "points {question.awarded_class}", "{question.awarded}" }
            }
            div { class: "answers",
                for answer in question.answers.clone() {
                    div { class: answer.class,
                        input { r#type: "checkbox", checked: answer.selected, disabled: true }
                        span { "{answer.text}" }
                    }
                }
            }
        }
    }
}
