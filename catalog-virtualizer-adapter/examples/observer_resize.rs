use std::cell::RefCell;
use std::rc::Rc;

use catalog_virtualizer::{CatalogVirtualizer, GridOptions, Group, VirtualizerOptions};
use catalog_virtualizer_adapter::{Controller, ViewportObserver};

fn main() {
    // Example: a mounted grid whose resize binding feeds the controller.
    //
    // Resizing changes the column count; the controller keeps the group at the top of the
    // viewport in place instead of leaving the user at a stale pixel offset.
    let groups: Vec<Group<u32, u32>> = (0..30)
        .map(|g| Group::new(g, (0..17).collect()).with_header(format!("Genre {g}")))
        .collect();
    let options = VirtualizerOptions::grid(200, GridOptions::new(150, 12)).with_header_height(36);
    let controller = Rc::new(RefCell::new(Controller::from_virtualizer(
        CatalogVirtualizer::with_groups(options, groups),
    )));

    let mut observer = ViewportObserver::new();
    let subscription = observer.bind();
    subscription.subscribe({
        let controller = Rc::clone(&controller);
        move |viewport, change| {
            let moved = controller
                .borrow_mut()
                .on_viewport_change(viewport, change, 0);
            if let Some(off) = moved {
                println!("  {change:?}: container must scroll to {off}");
            }
        }
    });

    observer.on_resize(1_000, 800);
    let top = controller.borrow_mut().jump_to_group(&12).unwrap_or(0);
    observer.on_scroll(top + 50);

    for width in [640u32, 1_400, 480] {
        observer.on_resize(width, 800);
        let c = controller.borrow();
        println!(
            "width={width} columns={} scroll_top={} active={:?}",
            c.virtualizer().columns(),
            c.virtualizer().scroll_top(),
            c.virtualizer().active_group().map(|g| g.id)
        );
    }

    // Unmount: dropping the binding releases the listener; later resizes are ignored.
    drop(subscription);
    println!("bound={} resize_applied={}", observer.is_bound(), observer.on_resize(2_000, 800));
}
