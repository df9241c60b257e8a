use float_ord::FloatOrd;
use log::{trace, warn};
use rand::Rng;
use wfc_rules::{TileCatalog, TileId, TileSet};

/// Picks one tile out of `options`.
///
/// A tile with weight 0 is forced: the first such tile in catalog order is
/// returned without drawing. Otherwise the weights are normalized over
/// `options`, a threshold is drawn uniformly between the smallest and largest
/// normalized weight, and the result is picked uniformly among the tiles whose
/// normalized weight reaches the threshold. This favors heavy tiles more
/// strongly than proportional sampling.
///
/// Returns `None` (and logs a warning) when `options` is empty.
pub fn select_tag<R: Rng + ?Sized>(
    options: &TileSet,
    catalog: &TileCatalog,
    rng: &mut R,
) -> Option<TileId> {
    if options.is_empty() {
        warn!("select_tag called on a cell with no options");
        return None;
    }

    let weighted: Vec<(TileId, f64)> = options
        .iter()
        .map(|id| {
            let weight = catalog.tile(id).map_or(0.0, |model| f64::from(model.weight));
            (id, weight)
        })
        .collect();

    if let Some(&(forced, _)) = weighted.iter().find(|(_, weight)| *weight == 0.0) {
        trace!("Tile {} has weight 0, selecting it directly", forced);
        return Some(forced);
    }

    let total: f64 = weighted.iter().map(|(_, weight)| weight).sum();
    let normalized: Vec<(TileId, f64)> = weighted
        .into_iter()
        .map(|(id, weight)| (id, weight / total))
        .collect();

    let min_w = normalized.iter().map(|&(_, w)| FloatOrd(w)).min()?.0;
    let max_w = normalized.iter().map(|&(_, w)| FloatOrd(w)).max()?.0;
    let threshold = rng.gen_range(min_w..=max_w);

    let survivors: Vec<TileId> = normalized
        .iter()
        .filter(|&&(_, w)| w >= threshold)
        .map(|&(id, _)| id)
        .collect();

    if survivors.is_empty() {
        // Only reachable through rounding; the heaviest tile always qualifies.
        return normalized
            .iter()
            .max_by_key(|&&(_, w)| FloatOrd(w))
            .map(|&(id, _)| id);
    }
    Some(survivors[rng.gen_range(0..survivors.len())])
}
