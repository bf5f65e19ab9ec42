use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::AppContext;
use crate::views::{CourseTestsView, HomeView, ResultsView, TakeTestView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/courses/:course_id", CourseTestsView)] CourseTests { course_id: String },
        #[route("/tests/:test_id", TakeTestView)] TakeTest { test_id: String },
        #[route("/results", ResultsView)] Results {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    rsx! {
        nav { class: "sidebar",
            h1 { "EduHub" }
            ul {
                li { Link { to: Route::Home {}, "Home" } }
                if let Some(course_id) = ctx.default_course_id() {
                    li {
                        Link {
                            to: Route::CourseTests { course_id: course_id.to_string() },
                            "Course"
                        }
                    }
                }
                li { Link { to: Route::Results {}, "Last result" } }
            }
        }
    }
}
