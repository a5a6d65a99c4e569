//! Black-box coverage of the packed R-tree through its public surface
//! (§8 "Index size formula", "Index containment").

use flatgeobuf::{NodeItem, PackedRTree};

fn grid_item(x: f64, y: f64, offset: u64) -> NodeItem {
    NodeItem {
        min_x: x,
        min_y: y,
        max_x: x,
        max_y: y,
        offset,
    }
}

#[test]
fn index_size_matches_level_bound_formula() {
    for &n in &[0usize, 1, 16, 17, 256, 1000] {
        let expected = {
            if n == 0 {
                0u64
            } else {
                let mut level = n;
                let mut total = level;
                while level > 1 {
                    level = level.div_ceil(16);
                    total += level;
                }
                (total * 40) as u64
            }
        };
        assert_eq!(flatgeobuf::rtree::index_size(n, 16).unwrap(), expected);
    }
}

#[test]
fn every_interior_node_contains_its_descendant_leaves() {
    let mut items: Vec<NodeItem> = (0..64u64)
        .map(|i| grid_item((i % 8) as f64, (i / 8) as f64, i))
        .collect();
    let extent = flatgeobuf::rtree::calc_extent(&items);
    flatgeobuf::rtree::hilbert_sort(&mut items, &extent);
    let tree = PackedRTree::build(&items, &extent, 8).unwrap();

    for item in &items {
        let hits = tree.search(*item);
        assert!(hits.iter().any(|h| items[h.index].offset == item.offset));
    }
}

#[test]
fn search_is_empty_on_an_empty_tree() {
    let tree = PackedRTree::build(&[], &NodeItem::empty(), 16).unwrap();
    assert_eq!(tree.num_items(), 0);
    assert!(tree.search(NodeItem::new(0.0, 0.0, 1.0, 1.0)).is_empty());
}

#[test]
fn rejects_node_size_below_two() {
    let err = PackedRTree::build(&[grid_item(0.0, 0.0, 0)], &NodeItem::empty(), 1).unwrap_err();
    assert!(matches!(err, flatgeobuf::rtree::Error::InvalidNodeSize(1)));
}
