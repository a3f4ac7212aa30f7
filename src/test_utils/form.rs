use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let hx_attribute = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        hx_attribute, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {hx_attribute:?}"
    );
}

fn find_input<'a>(form: &ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    form.select(&Selector::parse("input").unwrap())
        .find(|input| input.value().attr("name") == Some(name))
}

#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = find_input(form, name)
        .unwrap_or_else(|| panic!("No input found with name \"{name}\" and type \"{type_}\""));
    let input_type = input.value().attr("type").unwrap_or_default();

    assert_eq!(
        input_type, type_,
        "want input with type \"{type_}\", got {input_type:?}"
    );
    assert!(
        input.value().attr("required").is_some(),
        "want input with name {name} to have the required attribute but got none"
    );
}

#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    assert_form_input(form, name, type_);

    let input = find_input(form, name).expect("input disappeared");
    let input_value = input.value().attr("value").unwrap_or_default();
    assert_eq!(
        input_value, value,
        "want input with value \"{value}\", got {input_value:?}"
    );
}

#[track_caller]
pub(crate) fn assert_form_checkbox(form: &ElementRef<'_>, name: &str, want_checked: bool) {
    let input = find_input(form, name)
        .unwrap_or_else(|| panic!("No checkbox found with name \"{name}\""));
    let input_type = input.value().attr("type").unwrap_or_default();
    let is_checked = input.value().attr("checked").is_some();

    assert_eq!(input_type, "checkbox", "want checkbox, got {input_type:?}");
    assert_eq!(
        is_checked, want_checked,
        "want checkbox {name} checked={want_checked}, got checked={is_checked}"
    );
}

#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    let submit_button = form
        .select(&Selector::parse("button[type=submit]").unwrap())
        .next()
        .expect("No submit button found");

    let got_text = submit_button.text().collect::<Vec<_>>().join("");
    assert_eq!(text, got_text.trim());
}

/// Assert that the form contains an error paragraph with `want_error_message`.
#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want_error_message: &str) {
    let selector = Selector::parse("p.form-error").unwrap();
    let error_messages = form
        .select(&selector)
        .map(|p| p.text().collect::<Vec<_>>().join("").trim().to_owned())
        .collect::<Vec<_>>();

    assert!(
        error_messages.iter().any(|message| message == want_error_message),
        "want error message {want_error_message:?}, got {error_messages:?}"
    );
}
