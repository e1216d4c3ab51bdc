use crate::*;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 11
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start) as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_usize(start as usize, end_exclusive as usize) as u32
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Groups of `u32` records with ids `0..n` and headers `"G{id}"`.
fn list_groups(sizes: &[usize]) -> Vec<Group<u32, u32>> {
    sizes
        .iter()
        .enumerate()
        .map(|(g, &n)| {
            let records = (0..n as u32).map(|r| g as u32 * 1000 + r).collect();
            Group::new(g as u32, records).with_header(format!("G{g}"))
        })
        .collect()
}

fn random_groups(rng: &mut Lcg) -> Vec<Group<u32, u32>> {
    let count = rng.gen_range_usize(0, 12);
    (0..count as u32)
        .map(|id| {
            let body = if rng.gen_bool() {
                let n = rng.gen_range_usize(0, 20);
                GroupBody::Records((0..n as u32).collect())
            } else {
                let k = rng.gen_range_usize(0, 4);
                GroupBody::Sections(
                    (0..k)
                        .map(|d| {
                            let n = rng.gen_range_usize(0, 8);
                            Section::new(format!("Disc {}", d + 1), (0..n as u32).collect())
                        })
                        .collect(),
                )
            };
            let header = match rng.gen_range_usize(0, 3) {
                0 => None,
                1 => Some(String::new()),
                _ => Some(format!("G{id}")),
            };
            Group { id, header, body }
        })
        .collect()
}

fn random_options(rng: &mut Lcg) -> FlattenOptions {
    FlattenOptions {
        show_group_headers: rng.gen_bool(),
        mode: if rng.gen_bool() {
            GroupMode::Grid
        } else {
            GroupMode::List
        },
        columns: rng.gen_range_usize(0, 6),
        row_height: rng.gen_range_u32(0, 60),
        header_height: rng.gen_range_u32(0, 60),
        section_header_height: rng.gen_range_u32(0, 60),
    }
}

fn naive_visible(items: &[VirtualItem], viewport: Viewport, buffer: usize) -> VisibleRange {
    if viewport.container_height == 0 {
        return VisibleRange::EMPTY;
    }
    let top = viewport.scroll_top;
    let bottom = viewport.scroll_bottom();
    let hits: Vec<usize> = items
        .iter()
        .filter(|it| it.intersects(top, bottom))
        .map(|it| it.index)
        .collect();
    match (hits.first(), hits.last()) {
        (Some(&first), Some(&last)) => VisibleRange {
            start: first.saturating_sub(buffer),
            end: (last + buffer + 1).min(items.len()),
        },
        _ => VisibleRange::EMPTY,
    }
}

fn describe(view: ItemView<'_, u32, u32>, top: u64) -> String {
    match view {
        ItemView::Header { id, label } => format!("H{id}:{label}@{top}"),
        ItemView::SectionHeader { label } => format!("S:{label}@{top}"),
        ItemView::Row { records } => format!("W{records:?}@{top}"),
        ItemView::Record { record, index } => format!("R{record}#{index}@{top}"),
    }
}

#[test]
fn list_scenario_skips_groups_without_records() {
    let groups = list_groups(&[2, 0, 5]);
    let layout = flatten(&groups, &FlattenOptions::list(56).with_header_height(40));

    let headers: Vec<usize> = layout
        .items()
        .iter()
        .filter(|it| it.is_header())
        .map(|it| it.group)
        .collect();
    assert_eq!(headers, vec![0, 2]);
    assert_eq!(layout.record_count(), 7);
    assert_eq!(layout.len(), 9);
    assert_eq!(layout.total_height(), 40 + 2 * 56 + 40 + 5 * 56);
    assert_eq!(layout.group_offset(&1), None);
    assert_eq!(layout.group_offset(&2), Some(40 + 2 * 56));
}

#[test]
fn grid_scenario_packs_rows_of_three() {
    let groups = vec![Group::new(7u32, (0..7u32).collect())];
    let layout = flatten(&groups, &FlattenOptions::grid(3, 120));

    let rows: Vec<usize> = layout
        .items()
        .iter()
        .map(|it| match it.kind {
            ItemKind::Row { len, .. } => len,
            other => panic!("unexpected item {other:?}"),
        })
        .collect();
    assert_eq!(rows, vec![3, 3, 1]);
    assert_eq!(layout.total_height(), 3 * 120);

    let last = layout.items()[2].resolve(&groups).unwrap();
    assert!(matches!(last, ItemView::Row { records: [6] }));
}

#[test]
fn empty_input_is_an_empty_layout() {
    let groups: Vec<Group<u32, u32>> = Vec::new();
    let layout = flatten(&groups, &FlattenOptions::default());
    assert!(layout.is_empty());
    assert_eq!(layout.total_height(), 0);

    let vp = Viewport::new(0, 500, 800);
    assert!(layout.visible_range(vp, 5).is_empty());
    assert!(layout.visible_items(vp, 5).is_empty());
    assert!(layout.item_at_offset(0).is_none());
}

#[test]
fn hidden_headers_emit_no_header_items() {
    let groups = list_groups(&[3, 4]);
    let layout = flatten(&groups, &FlattenOptions::list(10).with_group_headers(false));
    assert!(layout.items().iter().all(|it| !it.is_header()));
    assert_eq!(layout.total_height(), 70);
    // The group offset falls back to the group's first record.
    assert_eq!(layout.group_offset(&1), Some(30));
}

#[test]
fn empty_header_label_is_not_a_header() {
    let groups = vec![
        Group::new(1u32, vec![1u32, 2]).with_header(""),
        Group::new(2u32, vec![3u32]),
    ];
    let layout = flatten(&groups, &FlattenOptions::list(10));
    assert_eq!(layout.len(), 3);
    assert!(layout.items().iter().all(|it| !it.is_header()));
    assert!(layout.header_for_group(0).is_none());
}

#[test]
fn single_section_header_is_suppressed() {
    let groups = vec![
        Group::with_sections(
            1u32,
            vec![
                Section::new("Disc 1", vec![1u32, 2]),
                Section::new("Disc 2", Vec::new()),
            ],
        )
        .with_header("Album"),
    ];
    let layout = flatten(&groups, &FlattenOptions::list(10));
    let kinds: Vec<ItemKind> = layout.items().iter().map(|it| it.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ItemKind::Header,
            ItemKind::Record {
                section: Some(0),
                position: 0,
                ordinal: 0
            },
            ItemKind::Record {
                section: Some(0),
                position: 1,
                ordinal: 1
            },
        ]
    );
}

#[test]
fn sections_render_with_headers_in_order() {
    let groups = vec![
        Group::with_sections(
            9u32,
            vec![
                Section::new("Disc 1", vec![1u32, 2]),
                Section::new("Disc 2", vec![3u32]),
            ],
        )
        .with_header("Album"),
    ];
    let opts = VirtualizerOptions::new(
        FlattenOptions::list(10)
            .with_header_height(20)
            .with_section_header_height(15),
    )
    .with_buffer(0)
    .with_initial_viewport(Viewport::new(0, 100, 300));
    let v = CatalogVirtualizer::with_groups(opts, groups);
    assert_eq!(v.total_height(), 80);

    let mut drawn = Vec::new();
    v.for_each_visible(&mut |view: ItemView<'_, u32, u32>, top: u64, _height: u32| {
        drawn.push(describe(view, top));
    });
    assert_eq!(
        drawn,
        vec![
            "H9:Album@0",
            "S:Disc 1@20",
            "R1#0@35",
            "R2#1@45",
            "S:Disc 2@55",
            "R3#2@70",
        ]
    );
}

#[test]
fn sectioned_grid_restarts_rows_per_section() {
    let groups = vec![Group::with_sections(
        1u32,
        vec![
            Section::new("Disc 1", (0..4u32).collect()),
            Section::new("Disc 2", (4..6u32).collect()),
        ],
    )];
    let layout = flatten(&groups, &FlattenOptions::grid(3, 50).with_section_header_height(20));
    let mut drawn = Vec::new();
    for it in layout.items() {
        drawn.push(describe(it.resolve(&groups).unwrap(), it.top));
    }
    assert_eq!(
        drawn,
        vec![
            "S:Disc 1@0",
            "W[0, 1, 2]@20",
            "W[3]@70",
            "S:Disc 2@120",
            "W[4, 5]@140",
        ]
    );
    assert_eq!(layout.record_count(), 6);
}

#[test]
fn zero_columns_and_zero_heights_are_clamped() {
    let groups = vec![Group::new(1u32, vec![1u32, 2, 3]).with_header("A")];
    let opts = FlattenOptions {
        show_group_headers: true,
        mode: GroupMode::Grid,
        columns: 0,
        row_height: 0,
        header_height: 0,
        section_header_height: 0,
    };
    let layout = flatten(&groups, &opts);
    assert_eq!(layout.columns(), 1);
    assert_eq!(layout.len(), 4);
    assert!(layout.items().iter().all(|it| it.height == 1));
    assert_eq!(layout.total_height(), 4);
}

#[test]
fn duplicate_group_ids_keep_first_offset() {
    let groups = vec![
        Group::new(1u32, vec![1u32]).with_header("A"),
        Group::new(1u32, vec![2u32]).with_header("A again"),
    ];
    let layout = flatten(&groups, &FlattenOptions::list(10));
    assert_eq!(layout.group_offset(&1), Some(0));
    assert_eq!(layout.group_position(&1), Some(0));
    assert_eq!(layout.len(), 4);
}

#[test]
fn compute_columns_floor_and_fit() {
    assert_eq!(compute_columns(0, 180, 16), 1);
    assert_eq!(compute_columns(100, 180, 16), 1);
    assert_eq!(compute_columns(180, 180, 16), 1);
    assert_eq!(compute_columns(376, 180, 16), 2);
    assert_eq!(compute_columns(375, 180, 16), 1);
    assert_eq!(compute_columns(1000, 0, 0), 1);
    assert_eq!(compute_columns(1000, 100, 0), 10);
}

#[test]
fn compute_columns_is_monotonic_in_width() {
    let mut rng = Lcg::new(7);
    for _ in 0..64 {
        let item_width = rng.gen_range_u32(0, 300);
        let gap = rng.gen_range_u32(0, 40);
        let mut prev = compute_columns(0, item_width, gap);
        assert_eq!(prev, 1);
        for width in (0..4000u32).step_by(7) {
            let cols = compute_columns(width, item_width, gap);
            assert!(cols >= 1);
            assert!(cols >= prev, "width={width} item={item_width} gap={gap}");
            prev = cols;
        }
    }
}

#[test]
fn visible_range_adds_buffer_and_clamps() {
    let groups = vec![Group::new(0u32, (0..100u32).collect())];
    let layout = flatten(&groups, &FlattenOptions::list(10));

    let r = layout.visible_range(Viewport::new(0, 50, 100), 3);
    assert_eq!(r, VisibleRange { start: 0, end: 8 });

    let r = layout.visible_range(Viewport::new(505, 50, 100), 3);
    // Items 50..=55 intersect [505, 555).
    assert_eq!(r, VisibleRange { start: 47, end: 59 });

    let r = layout.visible_range(Viewport::new(980, 50, 100), 3);
    assert_eq!(r, VisibleRange { start: 95, end: 100 });

    assert!(layout.visible_range(Viewport::new(1000, 50, 100), 3).is_empty());
    assert!(layout.visible_range(Viewport::new(0, 0, 100), 3).is_empty());
}

#[test]
fn item_boundaries_are_half_open() {
    let groups = vec![Group::new(0u32, (0..10u32).collect())];
    let layout = flatten(&groups, &FlattenOptions::list(10));
    // [20, 30) touches item 1's bottom and item 3's top: only item 2 intersects.
    let r = layout.visible_range(Viewport::new(20, 10, 100), 0);
    assert_eq!(r, VisibleRange { start: 2, end: 3 });
    assert_eq!(layout.item_at_offset(20).map(|it| it.index), Some(2));
    assert_eq!(layout.item_at_offset(19).map(|it| it.index), Some(1));
    assert!(layout.item_at_offset(100).is_none());
}

#[test]
fn property_random_layout_invariants() {
    for seed in 0..256u64 {
        let mut rng = Lcg::new(seed);
        let groups = random_groups(&mut rng);
        let opts = random_options(&mut rng);
        let layout = flatten(&groups, &opts);

        // Offset consistency.
        let items = layout.items();
        if let Some(first) = items.first() {
            assert_eq!(first.top, 0);
        }
        for (i, it) in items.iter().enumerate() {
            assert_eq!(it.index, i);
            assert!(it.height > 0);
        }
        for w in items.windows(2) {
            assert_eq!(w[1].top, w[0].top + w[0].height as u64, "seed={seed}");
        }
        let expected_total = items.last().map(|it| it.bottom()).unwrap_or(0);
        assert_eq!(layout.total_height(), expected_total);

        // Idempotence.
        assert_eq!(flatten(&groups, &opts), layout, "seed={seed}");

        // Record accounting.
        let total_records: usize = groups.iter().map(|g| g.record_count()).sum();
        assert_eq!(layout.record_count(), total_records);
        let mut packed = 0usize;
        for it in items {
            match it.resolve(&groups).unwrap() {
                ItemView::Row { records } => {
                    assert!(!records.is_empty());
                    assert!(records.len() <= opts.effective_columns());
                    packed += records.len();
                }
                ItemView::Record { index, .. } => {
                    assert_eq!(index, packed);
                    packed += 1;
                }
                _ => {}
            }
        }
        assert_eq!(packed, total_records);

        // Header emission: exactly one per non-empty group with a label, right at its start.
        for (gi, group) in groups.iter().enumerate() {
            let headers = items
                .iter()
                .filter(|it| it.group == gi && it.is_header())
                .count();
            let expected =
                opts.show_group_headers && group.header_label().is_some() && !group.is_empty();
            assert_eq!(headers, expected as usize, "seed={seed} group={gi}");
            if expected {
                let header = layout.header_for_group(gi).unwrap();
                assert_eq!(Some(header.top), layout.group_offset(&group.id));
            }
            if group.is_empty() {
                assert!(items.iter().all(|it| it.group != gi));
                assert_eq!(layout.group_offset(&group.id), None);
            }
        }

        // Groups stay in input order.
        for w in items.windows(2) {
            assert!(w[0].group <= w[1].group);
        }

        // Binary search agrees with a linear interval filter.
        let total = layout.total_height();
        for _ in 0..32 {
            let vp = Viewport::new(
                rng.gen_range_usize(0, total as usize + 64) as u64,
                rng.gen_range_u32(0, 200),
                rng.gen_range_u32(0, 1000),
            );
            let buffer = rng.gen_range_usize(0, 6);
            let got = layout.visible_range(vp, buffer);
            assert_eq!(got, naive_visible(items, vp, buffer), "seed={seed} vp={vp:?}");
            assert!(got.end <= items.len());
        }
    }
}

#[test]
fn virtualizer_replans_columns_on_width_change() {
    let groups = vec![Group::new(0u32, (0..25u32).collect())];
    let mut v = CatalogVirtualizer::with_groups(
        VirtualizerOptions::grid(120, GridOptions::new(100, 10)),
        groups,
    );
    // Unmeasured container: one column, nothing visible yet.
    assert_eq!(v.columns(), 1);
    assert_eq!(v.total_height(), 25 * 120);
    assert!(v.visible_range().is_empty());

    v.set_container_size(330, 400);
    assert_eq!(v.columns(), 3);
    assert_eq!(v.layout().len(), 9);
    assert_eq!(v.total_height(), 9 * 120);
    let generation = v.layout_generation();

    // Same column count: no rebuild.
    v.set_container_size(335, 600);
    assert_eq!(v.layout_generation(), generation);

    v.set_container_size(450, 600);
    assert_eq!(v.columns(), 4);
    assert_eq!(v.total_height(), 7 * 120);
    assert_eq!(v.layout_generation(), generation + 1);
    assert_eq!(v.layout().columns(), 4);
}

#[test]
fn list_mode_ignores_container_width() {
    let mut v = CatalogVirtualizer::with_groups(
        VirtualizerOptions::new(FlattenOptions::list(10)),
        list_groups(&[3]),
    );
    let generation = v.layout_generation();
    v.set_container_size(2000, 100);
    assert_eq!(v.columns(), 1);
    assert_eq!(v.layout_generation(), generation);
}

#[test]
fn scroll_to_group_round_trip() {
    let mut v = CatalogVirtualizer::with_groups(
        VirtualizerOptions::new(FlattenOptions::list(20).with_header_height(30)),
        list_groups(&[10, 10, 10]),
    );
    v.set_container_size(300, 100);

    assert_eq!(v.scroll_to_group(&1), Some(230));
    assert_eq!(v.scroll_top(), 230);
    assert_eq!(v.scroll_to_group(&2), Some(460));
    assert_eq!(v.scroll_top(), 460);

    // Unknown group: silent no-op.
    assert_eq!(v.scroll_to_group(&99), None);
    assert_eq!(v.scroll_top(), 460);

    v.set_flatten_options(FlattenOptions::list(20).with_group_headers(false));
    assert_eq!(v.scroll_to_group(&1), Some(200));
    assert_eq!(v.scroll_top(), 200);
}

#[test]
fn scroll_to_group_clamps_to_max_scroll() {
    let mut v = CatalogVirtualizer::with_groups(
        VirtualizerOptions::new(FlattenOptions::list(10)),
        list_groups(&[10, 2]),
    );
    v.set_container_size(100, 50);
    // Group 1 starts at 110 but the content is only 140 tall.
    assert_eq!(v.max_scroll_top(), 90);
    assert_eq!(v.scroll_to_group(&1), Some(90));
}

#[test]
fn set_groups_rebuilds_unless_same_arc() {
    let groups: Arc<[Group<u32, u32>]> = Arc::from(list_groups(&[2, 2]));
    let mut v = CatalogVirtualizer::new(VirtualizerOptions::new(FlattenOptions::list(10)));
    assert!(v.layout().is_empty());

    v.set_groups(Arc::clone(&groups));
    let generation = v.layout_generation();
    assert_eq!(v.layout().len(), 6);

    v.set_groups(Arc::clone(&groups));
    assert_eq!(v.layout_generation(), generation);

    v.set_groups(list_groups(&[1]));
    assert_eq!(v.layout_generation(), generation + 1);
    assert_eq!(v.layout().len(), 2);
    assert_eq!(v.group_scroll_offset(&1), None);
}

#[test]
fn on_change_is_coalesced_in_batches() {
    let calls = Arc::new(AtomicUsize::new(0));
    let opts = VirtualizerOptions::new(FlattenOptions::list(10)).with_on_change(Some({
        let calls = Arc::clone(&calls);
        move |_: &CatalogVirtualizer<u32, u32>| {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    }));
    let mut v = CatalogVirtualizer::with_groups(opts, list_groups(&[50]));

    v.set_scroll_top(10);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Unchanged values do not notify.
    v.set_scroll_top(10);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    v.set_viewport(Viewport::new(40, 100, 200));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(v.viewport(), Viewport::new(40, 100, 200));
}

#[test]
fn active_group_and_pinned_header_follow_scroll() {
    let mut v = CatalogVirtualizer::with_groups(
        VirtualizerOptions::new(FlattenOptions::list(10)),
        list_groups(&[5, 5]),
    );
    v.set_container_size(100, 30);

    assert_eq!(v.active_group().map(|g| g.id), Some(0));
    assert!(v.pinned_header().is_none());

    v.set_scroll_top(25);
    assert_eq!(v.active_group().map(|g| g.id), Some(0));
    assert_eq!(v.pinned_header().map(|h| h.group), Some(0));

    v.set_scroll_top(65);
    assert_eq!(v.active_group().map(|g| g.id), Some(1));
    assert_eq!(v.pinned_header().map(|h| h.top), Some(60));
}

#[test]
fn collect_visible_items_matches_range() {
    let mut v = CatalogVirtualizer::with_groups(
        VirtualizerOptions::new(FlattenOptions::list(10)).with_buffer(2),
        list_groups(&[100]),
    );
    v.set_viewport(Viewport::new(200, 50, 100));
    let mut out = Vec::new();
    v.collect_visible_items(&mut out);
    let range = v.visible_range();
    assert_eq!(out.len(), range.len());
    assert_eq!(out.first().map(|it| it.index), Some(range.start));
    assert_eq!(out.last().map(|it| it.index + 1), Some(range.end));
}

#[test]
fn renderer_trait_accepts_structs() {
    struct Count {
        headers: usize,
        records: usize,
    }
    impl ItemRenderer<u32, u32> for Count {
        fn render(&mut self, item: ItemView<'_, u32, u32>, _top: u64, _height: u32) {
            match item {
                ItemView::Header { .. } => self.headers += 1,
                ItemView::Record { .. } => self.records += 1,
                _ => {}
            }
        }
    }

    let v = CatalogVirtualizer::with_groups(
        VirtualizerOptions::new(FlattenOptions::list(10))
            .with_buffer(0)
            .with_initial_viewport(Viewport::new(0, 25, 100)),
        list_groups(&[5]),
    );
    let mut count = Count {
        headers: 0,
        records: 0,
    };
    v.for_each_visible(&mut count);
    assert_eq!(count.headers, 1);
    assert_eq!(count.records, 2);
}

#[test]
fn split_sections_breaks_on_disc_change() {
    let tracks = vec![(1u32, "a"), (1, "b"), (2, "c"), (2, "d"), (3, "e")];
    let sections = split_sections(tracks, |t| t.0, |disc| format!("Disc {disc}"));
    let labels: Vec<&str> = sections.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Disc 1", "Disc 2", "Disc 3"]);
    assert_eq!(sections[1].records, vec![(2, "c"), (2, "d")]);

    let empty: Vec<Section<(u32, &str)>> =
        split_sections(Vec::new(), |t: &(u32, &str)| t.0, |d| d.to_string());
    assert!(empty.is_empty());
}

#[test]
fn group_by_initial_buckets_names() {
    let artists = vec!["2Pac", "abba", "ACDC", "Beck", "björk", " Zappa"];
    let groups = group_by_initial(artists, |a| *a);
    let ids: Vec<char> = groups.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec!['#', 'A', 'B', 'Z']);
    assert_eq!(groups[1].header_label(), Some("A"));
    assert_eq!(groups[2].record_count(), 2);

    let layout = flatten(&groups, &FlattenOptions::list(10));
    assert_eq!(layout.group_offset(&'B'), Some(50));
}

#[test]
fn initial_of_handles_edge_cases() {
    assert_eq!(initial_of(""), '#');
    assert_eq!(initial_of("   "), '#');
    assert_eq!(initial_of("éclair"), 'É');
    assert_eq!(initial_of("!!!"), '#');
}
