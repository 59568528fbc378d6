use crate::domain::phone::CatalogItem;
use crate::domain::requirement::SpecificRequirement;

/// Catalog indices that survived the pre-filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefilterOutcome {
    pub indices: Vec<usize>,
    /// Every item failed and the full catalog was kept instead.
    pub fell_back: bool,
}

/// Keeps items satisfying every requirement, preserving catalog order.
pub fn satisfying_indices(
    items: &[CatalogItem],
    requirements: &[SpecificRequirement],
) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            requirements.iter().all(|requirement| {
                requirement.is_satisfied_by(item.raw_value(requirement.dimension))
            })
        })
        .map(|(index, _)| index)
        .collect()
}

/// Pre-filter with the over-constrained fallback: when nothing survives, the
/// unfiltered catalog is returned and `fell_back` is set.
pub fn prefilter(items: &[CatalogItem], requirements: &[SpecificRequirement]) -> PrefilterOutcome {
    let indices = satisfying_indices(items, requirements);
    if indices.is_empty() && !items.is_empty() {
        return PrefilterOutcome { indices: (0..items.len()).collect(), fell_back: true };
    }
    PrefilterOutcome { indices, fell_back: false }
}
