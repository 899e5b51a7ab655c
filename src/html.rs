use maud::{DOCTYPE, Markup, PreEscaped, html};

// Button styles
pub const BUTTON_UNDO_STYLE: &str = "px-6 py-3 text-lg text-white rounded \
    bg-blue-500 dark:bg-blue-600 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 disabled:bg-gray-400 \
    disabled:dark:bg-gray-600 disabled:cursor-not-allowed";

// Text styles
pub const STATUS_TEXT_STYLE: &str = "text-base text-gray-700 dark:text-gray-300";
pub const RESULT_TEXT_STYLE: &str = "text-3xl font-bold text-center \
    whitespace-pre-line text-gray-900 dark:text-white";

// Page container
pub const PAGE_CONTAINER_STYLE: &str = "flex flex-col items-center justify-between \
    min-h-screen px-4 py-6 mx-auto max-w-lg";

/// Keep the scan input focused so the scanner always types into it.
const REFOCUS_SCRIPT: &str = r#"
document.addEventListener("htmx:afterSettle", function () {
    const input = document.getElementById("scan-input");
    if (input) {
        input.value = "";
        input.focus();
    }
});
document.addEventListener("click", function () {
    const input = document.getElementById("scan-input");
    if (input) {
        input.focus();
    }
});
"#;

pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Stock Kiosk" }
                link href="/static/main.css" rel="stylesheet";

                script src="/static/htmx-2.0.8-min.js" {}

                style
                {
                    r#"
                    #scan-input {
                        position: absolute;
                        left: -1000px;
                        top: -1000px;
                    }
                    "#
                }

                script { (PreEscaped(REFOCUS_SCRIPT)) }
            }

            body class="container max-w-full min-h-screen bg-green-50 dark:bg-gray-900"
            {
                (content)
            }
        }
    }
}
