use eduhub_core::grading::{AnswerMark, ResultReport};

use crate::vm::time_fmt::{format_decimal, format_minutes, format_score};

/// CSS class for an answer's highlight on the result page.
#[must_use]
pub fn answer_class(mark: AnswerMark) -> &'static str {
    match mark {
        AnswerMark::CorrectSelected => "answer correct",
        AnswerMark::IncorrectSelected => "answer wrong",
        AnswerMark::MissedWithWrongSelected => "answer missed",
        AnswerMark::MissedWithCorrectSelected => "answer partial",
        AnswerMark::MissedAlone => "answer missed-alone",
        AnswerMark::Neutral => "answer",
    }
}

/// Legend entries shown above the graded questions.
pub const LEGEND: [(&str, &str); 4] = [
    ("legend-item correct", "Correct answer"),
    ("legend-item wrong", "Wrong answer"),
    ("legend-item partial", "Missed correct answers but no wrong answers"),
    ("legend-item missed", "Missed correct answer"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradedAnswerVm {
    pub text: String,
    pub selected: bool,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradedQuestionVm {
    pub label: String,
    pub weight: String,
    pub awarded: String,
    pub awarded_class: &'static str,
    pub answers: Vec<GradedAnswerVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub course_id: String,
    pub title: String,
    pub score: String,
    pub score_class: &'static str,
    pub time_taken: String,
    pub questions: Vec<GradedQuestionVm>,
}

#[must_use]
pub fn map_results(report: &ResultReport) -> ResultsVm {
    ResultsVm {
        course_id: report.course_id.to_string(),
        title: report.title.clone(),
        score: format_score(report.score),
        score_class: if report.passed { "pass" } else { "fail" },
        time_taken: format_minutes(report.duration_minutes),
        questions: report
            .questions
            .iter()
            .map(|question| GradedQuestionVm {
                label: format!("{}) {}", question.number, question.text),
                weight: format_decimal(question.weight),
                awarded: format_decimal(question.awarded_scaled),
                awarded_class: if question.earned_points() { "pass" } else { "fail" },
                answers: question
                    .answers
                    .iter()
                    .map(|answer| GradedAnswerVm {
                        text: answer.text.clone(),
                        selected: answer.selected,
                        class: answer_class(answer.mark),
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduhub_core::grading::render_result;
    use eduhub_core::model::{Test, TestResult};

    fn graded() -> (Test, TestResult) {
        let test: Test = serde_json::from_value(serde_json::json!({
            "id": "t1", "title": "Lifetimes", "courseId": "c1", "subjectId": "s1",
            "availableMinutes": 20,
            "questions": [
                {"id": "q1", "questionText": "Pick two", "points": 2, "answers": [
                    {"id": "A", "text": "A", "correctAnswer": true},
                    {"id": "B", "text": "B", "correctAnswer": true},
                    {"id": "C", "text": "C"}
                ]},
                {"id": "q2", "questionText": "Pick one", "points": 1, "answers": [
                    {"id": "A", "text": "A", "correctAnswer": true},
                    {"id": "B", "text": "B"},
                    {"id": "C", "text": "C"}
                ]}
            ]
        }))
        .unwrap();
        let result: TestResult = serde_json::from_value(serde_json::json!({
            "id": "r1", "testId": "t1", "studentId": "u1", "courseId": "c1",
            "score": 10, "success": false, "testDuration": 150,
            "questions": {"q1": ["A", "C"], "q2": []},
            "questionScores": {"q1": 1, "q2": 0}
        }))
        .unwrap();
        (test, result)
    }

    #[test]
    fn maps_marks_to_classes_and_labels() {
        let (test, result) = graded();
        let vm = map_results(&render_result(&test, &result).unwrap());

        assert_eq!(vm.course_id, "c1");
        assert_eq!(vm.score, "10 / 30");
        assert_eq!(vm.score_class, "fail");
        assert_eq!(vm.time_taken, "2.5 minutes");

        let first = &vm.questions[0];
        assert_eq!(first.label, "1) Pick two");
        assert_eq!(first.weight, "20");
        assert_eq!(first.awarded, "10");
        assert_eq!(first.awarded_class, "pass");
        let classes: Vec<_> = first.answers.iter().map(|a| a.class).collect();
        assert_eq!(classes, vec!["answer correct", "answer missed", "answer wrong"]);

        let second = &vm.questions[1];
        assert_eq!(second.awarded_class, "fail");
        assert_eq!(second.answers[0].class, "answer missed-alone");
    }

    #[test]
    fn negative_awarded_score_renders_as_fail() {
        let (test, _) = graded();
        let result: TestResult = serde_json::from_value(serde_json::json!({
            "id": "r2", "testId": "t1", "studentId": "u1", "courseId": "c1",
            "score": 0, "success": false, "testDuration": 60,
            "questions": {"q1": ["A"], "q2": ["B"]},
            "questionScores": {"q1": 1, "q2": -0.5}
        }))
        .unwrap();
        let vm = map_results(&render_result(&test, &result).unwrap());

        let second = &vm.questions[1];
        assert_eq!(second.awarded, "-5");
        assert_eq!(second.awarded_class, "fail");
        assert_eq!(second.answers[1].class, "answer wrong");
    }
}
