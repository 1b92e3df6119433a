//! Typed placeholder substitution for the emitted-source skeletons.
//!
//! Each template is an `include_str!` skeleton with `__NAME__` placeholders;
//! a variable set knows how to fill exactly one skeleton. Rendering checks
//! (debug builds) that every placeholder the skeleton declares is gone, so an
//! emitter bug fails here instead of producing un-compilable generated code.

use std::marker::PhantomData;

/// A set of variables that fills one template's placeholders.
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// An emitted-source skeleton tied to its variable set.
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    /// Fill the skeleton.
    pub fn render(&self, vars: &V) -> String {
        let rendered = vars.apply(self.content);
        #[cfg(debug_assertions)]
        for placeholder in placeholders(self.content) {
            assert!(
                !rendered.contains(placeholder),
                "unfilled placeholder {placeholder} in rendered template",
            );
        }
        rendered
    }
}

/// Variable set for skeletons without placeholders.
pub struct NoVars;

impl TemplateVars for NoVars {
    fn apply(&self, content: &str) -> String {
        content.to_string()
    }
}

/// Every `__NAME__` token a skeleton declares (uppercase/underscore names).
fn placeholders(content: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = content;
    while let Some(start) = rest.find("__") {
        let tail = &rest[start + 2..];
        match tail.find("__") {
            Some(len)
                if len > 0
                    && tail[..len]
                        .chars()
                        .all(|c| c.is_ascii_uppercase() || c == '_') =>
            {
                found.push(&rest[start..start + len + 4]);
                rest = &tail[len + 2..];
            }
            Some(_) => rest = tail,
            None => break,
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeting<'a> {
        name: &'a str,
    }

    impl TemplateVars for Greeting<'_> {
        fn apply(&self, content: &str) -> String {
            content.replace("__NAME__", self.name)
        }
    }

    #[test]
    fn test_render_fills_placeholders() {
        let template: Template<Greeting> = Template::new("hello __NAME__");
        assert_eq!(template.render(&Greeting { name: "world" }), "hello world");
    }

    #[test]
    fn test_placeholder_scan() {
        assert_eq!(
            placeholders("a __FIRST__ b __SECOND_PART__ c"),
            vec!["__FIRST__", "__SECOND_PART__"]
        );
        // Lowercase dunders are ordinary code, not placeholders
        assert!(placeholders("fn __main__()").is_empty());
        assert!(placeholders("no placeholders").is_empty());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "unfilled placeholder")]
    fn test_render_rejects_unfilled() {
        struct Empty;
        impl TemplateVars for Empty {
            fn apply(&self, content: &str) -> String {
                content.to_string()
            }
        }
        let template: Template<Empty> = Template::new("oops __LEFTOVER__");
        template.render(&Empty);
    }
}
