use crate::ItemView;

/// Draws one positioned item.
///
/// The engine never renders anything itself: for every item in the buffered visible range it
/// hands the resolved item plus its pixel box (`top` within the spacer, `height`) to a renderer.
/// Any `FnMut(ItemView<'_, K, R>, u64, u32)` closure is a renderer.
pub trait ItemRenderer<K, R> {
    fn render(&mut self, item: ItemView<'_, K, R>, top: u64, height: u32);
}

impl<K, R, F> ItemRenderer<K, R> for F
where
    F: FnMut(ItemView<'_, K, R>, u64, u32),
{
    fn render(&mut self, item: ItemView<'_, K, R>, top: u64, height: u32) {
        self(item, top, height)
    }
}
