//! Fixed prompts compiled in from `data/prompts/`.

pub const VISION_SYSTEM: &str = include_str!("../data/prompts/vision_system.txt");
pub const VISION_USER: &str = include_str!("../data/prompts/vision_user.txt");
pub const RECIPE_SYSTEM: &str = include_str!("../data/prompts/recipe_system.txt");
pub const RECIPE_USER: &str = include_str!("../data/prompts/recipe_user.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_occurrence() {
        assert_eq!(
            render("{{n}} eggs, {{n}} cups", &[("n", "2")]),
            "2 eggs, 2 cups"
        );
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{{a}} {{b}}", &[("a", "x")]), "x {{b}}");
    }

    #[test]
    fn test_prompts_are_non_empty() {
        assert!(!VISION_SYSTEM.is_empty());
        assert!(!VISION_USER.is_empty());
        assert!(!RECIPE_SYSTEM.is_empty());
        assert!(!RECIPE_USER.is_empty());
    }

    #[test]
    fn test_recipe_user_has_placeholders() {
        assert!(RECIPE_USER.contains("{{ingredients}}"));
        assert!(RECIPE_USER.contains("{{count}}"));
    }

    #[test]
    fn test_system_prompts_describe_json_shape() {
        assert!(VISION_SYSTEM.contains("\"ingredients\""));
        assert!(RECIPE_SYSTEM.contains("\"recipes\""));
        assert!(RECIPE_SYSTEM.contains("completeness_score"));
    }
}
