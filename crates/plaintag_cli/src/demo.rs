//! Built-in demo component

use plaintag_core::{parse, ComponentInstance, ComponentManager, Props};
use plaintag_dom::{helpers, Document};

pub const COMPONENT_NAME: &str = "testComponent";

/// `<div id="TestTag" class="TestClass"><h2>Hello {name}</h2></div>`
pub fn component(doc: &mut Document, props: Option<&Props>) -> Option<ComponentInstance> {
    let name = props
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("undefined");

    let element = helpers::make(doc, "div")?;
    helpers::insert_in(doc, element, "h2", Some(&format!("Hello {name}")));

    helpers::tag(doc, element, "TestTag");
    helpers::class_set(doc, element, "TestClass");

    parse(Some(element))
}

pub fn style() -> Option<String> {
    Some(
        r#"
.testComponent {
    padding: 4%;
    background-color: red;
    border-style: solid;
    border-width: 1.2rem;
    border-color: yellow;
}
"#
        .to_string(),
    )
}

/// Register the demo component with `manager`
pub fn register(manager: &mut ComponentManager) {
    manager.register(COMPONENT_NAME, component, style);
}
