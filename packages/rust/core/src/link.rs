//! Linking elements into their categories.

use docsite_shared::{Category, Element};

/// Attach to each category the elements that name it, in original order.
///
/// `indexInCategory` is set on the elements themselves (0-based position in
/// the category's list) and the category stores indexed copies. Elements
/// without a category are left alone.
pub fn link_elements_with_categories(
    elements: &mut [Element],
    categories: Vec<Category>,
) -> Vec<Category> {
    categories
        .into_iter()
        .map(|mut cat| {
            let mut linked = Vec::new();

            for el in elements
                .iter_mut()
                .filter(|el| el.category.as_deref() == Some(cat.name.as_str()))
            {
                el.index_in_category = Some(linked.len());
                linked.push(el.clone());
            }

            cat.elements = linked;
            cat
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, category: Option<&str>) -> Element {
        let mut el = Element::new(name, name);
        el.category = category.map(String::from);
        el
    }

    fn names(elements: &[Element]) -> Vec<(&str, Option<usize>)> {
        elements
            .iter()
            .map(|e| (e.name.as_str(), e.index_in_category))
            .collect()
    }

    #[test]
    fn links_in_original_order() {
        let mut elements = vec![
            element("e1", Some("x")),
            element("e2", Some("y")),
            element("e3", Some("x")),
        ];
        let categories = vec![Category::new("x", None), Category::new("y", None)];

        let linked = link_elements_with_categories(&mut elements, categories);

        assert_eq!(names(&linked[0].elements), vec![("e1", Some(0)), ("e3", Some(1))]);
        assert_eq!(names(&linked[1].elements), vec![("e2", Some(0))]);
        // indices are also visible on the flat list
        assert_eq!(
            names(&elements),
            vec![("e1", Some(0)), ("e2", Some(0)), ("e3", Some(1))]
        );
    }

    #[test]
    fn uncategorized_elements_are_not_visited() {
        let mut elements = vec![element("loose", None), element("e1", Some("x"))];
        let linked = link_elements_with_categories(&mut elements, vec![Category::new("x", None)]);

        assert_eq!(elements[0].index_in_category, None);
        assert_eq!(linked[0].elements.len(), 1);
    }

    #[test]
    fn empty_category_gets_no_elements() {
        let mut elements = vec![element("e1", Some("x"))];
        let linked = link_elements_with_categories(
            &mut elements,
            vec![Category::new("x", None), Category::new("empty", None)],
        );
        assert!(linked[1].elements.is_empty());
    }
}
