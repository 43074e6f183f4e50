use blog_core::{CreateForm, Draft, DraftField, Notice, SubmitStatus};
use maud::{html, Markup};

/// The write-post form. Field edits are mirrored to `/write/draft` so the
/// draft survives re-renders of the page while the form is open; submission
/// swaps this region with the result.
pub fn render(form: &CreateForm, notice: Option<&Notice>) -> Markup {
    html! {
        section #create-post .create-post {
            h2 { "Create New Post" }
            @if let Some(notice) = notice {
                div .notice.created[matches!(notice, Notice::Created(_))]
                    .failed[matches!(notice, Notice::Failed(_))] role="alert" {
                    (notice.message())
                }
            }
            form hx-post="/write" hx-target="#create-post" hx-swap="outerHTML"
                hx-disabled-elt="find button[type='submit']" {
                (input(&form.draft, DraftField::Title, "Title", "Enter post title"))
                (input(&form.draft, DraftField::Category, "Category (comma separated)", "TECH, FINANCE, LIFESTYLE"))
                (textarea(&form.draft, DraftField::Description, "Short Description", "Brief summary...", 3))
                (textarea(&form.draft, DraftField::Content, "Full Content", "Write your post here...", 12))
                input type="hidden" name=(DraftField::CoverImage.name()) value=(form.draft.cover_image);
                // htmx marks the form `htmx-request` while the post is in
                // flight; the stylesheet swaps the labels on that class.
                button .submit.submitting[form.is_submitting()] type="submit" disabled[form.is_submitting()] {
                    span .label-idle { (submit_label(SubmitStatus::Idle)) }
                    span .label-busy { (submit_label(SubmitStatus::Submitting)) }
                }
            }
        }
    }
}

pub fn submit_label(status: SubmitStatus) -> &'static str {
    match status {
        SubmitStatus::Idle => "Publish Post",
        SubmitStatus::Submitting => "Creating...",
    }
}

fn input(draft: &Draft, field: DraftField, label: &str, placeholder: &str) -> Markup {
    html! {
        div .field {
            label for=(field.name()) { (label) }
            input #(field.name()) type="text" name=(field.name()) placeholder=(placeholder)
                required value=(draft.value(field))
                hx-post="/write/draft" hx-trigger="input changed delay:300ms" hx-swap="none";
        }
    }
}

fn textarea(draft: &Draft, field: DraftField, label: &str, placeholder: &str, rows: u8) -> Markup {
    html! {
        div .field {
            label for=(field.name()) { (label) }
            textarea #(field.name()) name=(field.name()) placeholder=(placeholder) rows=(rows)
                required
                hx-post="/write/draft" hx-trigger="input changed delay:300ms" hx-swap="none" {
                // The parser drops one newline right after `<textarea>`.
                "\n"
                (draft.value(field))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blog_core::form::DEFAULT_COVER_IMAGE;

    use super::*;
    use crate::components::fixtures::post;

    #[test]
    fn fresh_form_carries_default_cover_image() {
        let html = render(&CreateForm::default(), None).into_string();
        assert!(html.contains(DEFAULT_COVER_IMAGE));
        assert!(html.contains("Publish Post"));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn draft_values_are_rendered_back() {
        let mut form = CreateForm::default();
        form.update(|d| d.with_title("Keep me").with_content("Line 1\nLine 2"));
        let html = render(&form, None).into_string();
        assert!(html.contains(r#"value="Keep me""#));
        assert!(html.contains("Line 1\nLine 2</textarea>"));
    }

    #[test]
    fn leading_newline_in_textarea_survives_reparse() {
        let mut form = CreateForm::default();
        form.update(|d| d.with_content("\nIndented start"));
        let html = render(&form, None).into_string();
        assert!(html.contains("hx-swap=\"none\">\n\nIndented start</textarea>"));
    }

    #[test]
    fn idle_button_carries_both_labels_for_in_flight_swap() {
        let html = render(&CreateForm::default(), None).into_string();
        assert!(html.contains(r#"<button class="submit" type="submit"><span class="label-idle">Publish Post</span><span class="label-busy">Creating...</span></button>"#));
    }

    #[test]
    fn submitting_disables_button() {
        let form = CreateForm {
            status: SubmitStatus::Submitting,
            ..Default::default()
        };
        let html = render(&form, None).into_string();
        assert!(html.contains(r#"<button class="submit submitting" type="submit" disabled>"#));
    }

    #[test]
    fn notices_render_as_alerts() {
        let created = Notice::Created(post("1", "T"));
        let html = render(&CreateForm::default(), Some(&created)).into_string();
        assert!(html.contains(r#"class="notice created" role="alert""#));
        assert!(html.contains("Post created successfully!"));

        let failed = Notice::Failed("HTTP 500: down".to_string());
        let html = render(&CreateForm::default(), Some(&failed)).into_string();
        assert!(html.contains("Error creating post: HTTP 500: down"));
    }
}
