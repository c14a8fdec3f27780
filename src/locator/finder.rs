use crate::error::{Result, ScrapeError};
use crate::locator::tag_filter::TagFilter;
use scraper::{ElementRef, Node};

/// Depth-first search below `root` for the first element matching the
/// filter, in document order. The root itself is never a candidate.
///
/// A miss is an error naming the filter: it is the signal that the
/// site's markup no longer matches this tool's assumptions.
pub fn find_tag<'a>(root: ElementRef<'a>, filter: &TagFilter) -> Result<ElementRef<'a>> {
    descendant_elements(root)
        .find(|element| filter.matches(*element))
        .ok_or_else(|| ScrapeError::TagNotFound {
            tag: filter.name().to_string(),
            attrs: filter.attrs_description(),
        })
}

/// Every descendant matching the filter, in document order. An empty
/// result is not an error; listing routines decide what emptiness means.
pub fn find_all_tags<'a>(root: ElementRef<'a>, filter: &TagFilter) -> Vec<ElementRef<'a>> {
    descendant_elements(root)
        .filter(|element| filter.matches(*element))
        .collect()
}

/// Concatenated text of the element and its descendants.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// The next element sibling, skipping text and comment nodes.
pub fn next_sibling_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut node = element.next_sibling();
    while let Some(current) = node {
        if matches!(current.value(), Node::Element(_)) {
            return ElementRef::wrap(current);
        }
        node = current.next_sibling();
    }
    None
}

fn descendant_elements(root: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    // descendants() yields the root first.
    root.descendants().skip(1).filter_map(ElementRef::wrap)
}
