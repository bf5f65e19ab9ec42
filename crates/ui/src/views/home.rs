use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let user_id = ctx.user_id();
    let course_id = ctx.default_course_id();

    rsx! {
        div { class: "page home",
            h2 { "Welcome" }
            p { "Signed in as {user_id}" }
            if let Some(course_id) = course_id {
                p {
                    Link {
                        to: Route::CourseTests { course_id: course_id.to_string() },
                        "Open course {course_id}"
                    }
                }
            } else {
                p { "No course selected. Start the app with --course-id to list its tests." }
            }
            p {
                Link { to: Route::Results {}, "Show last result" }
            }
        }
    }
}
