use super::*;

fn ids(n: usize) -> Vec<NodeId> {
    (0..n).map(|_| NodeId::next()).collect()
}

fn order(queue: &RenderQueue<&'static str>) -> Vec<&'static str> {
    queue.iter().map(|(_, _, item)| *item).collect()
}

#[test]
fn test_bucket_for_transparency() {
    assert_eq!(Bucket::for_transparency(false), Bucket::Opaque);
    assert_eq!(Bucket::for_transparency(true), Bucket::Transparent);
}

#[test]
fn test_opaque_then_transparent_in_insertion_order() {
    let id = ids(4);
    let mut queue = RenderQueue::new();
    queue.insert(id[0], "t0", Bucket::Transparent);
    queue.insert(id[1], "o0", Bucket::Opaque);
    queue.insert(id[2], "t1", Bucket::Transparent);
    queue.insert(id[3], "o1", Bucket::Opaque);

    assert_eq!(order(&queue), vec!["o0", "o1", "t0", "t1"]);
    assert_eq!(queue.opaque_len(), 2);
    assert_eq!(queue.transparent_len(), 2);
    assert_eq!(queue.ids(Bucket::Opaque), vec![id[1], id[3]]);
}

#[test]
fn test_reinsert_replaces_in_place() {
    let id = ids(3);
    let mut queue = RenderQueue::new();
    queue.insert(id[0], "a", Bucket::Opaque);
    queue.insert(id[1], "b", Bucket::Opaque);
    queue.insert(id[2], "c", Bucket::Opaque);

    let superseded = queue.insert(id[1], "b2", Bucket::Opaque);
    assert_eq!(superseded, Some("b"));
    assert_eq!(queue.len(), 3);
    assert_eq!(order(&queue), vec!["a", "b2", "c"]);
}

#[test]
fn test_bucket_change_moves_to_end() {
    let id = ids(3);
    let mut queue = RenderQueue::new();
    queue.insert(id[0], "a", Bucket::Opaque);
    queue.insert(id[1], "b", Bucket::Opaque);
    queue.insert(id[2], "t", Bucket::Transparent);

    let superseded = queue.insert(id[0], "a2", Bucket::Transparent);
    assert_eq!(superseded, Some("a"));
    assert_eq!(queue.bucket_of(id[0]), Some(Bucket::Transparent));
    assert_eq!(queue.len(), 3);
    assert_eq!(order(&queue), vec!["b", "t", "a2"]);

    queue.insert(id[0], "a3", Bucket::Opaque);
    assert_eq!(order(&queue), vec!["b", "a3", "t"]);
}

#[test]
fn test_remove_keeps_order_and_index() {
    let id = ids(4);
    let mut queue = RenderQueue::new();
    for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
        queue.insert(id[i], *name, Bucket::Opaque);
    }

    assert_eq!(queue.remove(id[1]), Some("b"));
    assert_eq!(queue.remove(id[1]), None);
    assert_eq!(order(&queue), vec!["a", "c", "d"]);
    // indices after the removed slot still resolve
    assert_eq!(queue.get(id[3]), Some(&"d"));
    assert_eq!(queue.insert(id[2], "c2", Bucket::Opaque), Some("c"));
    assert_eq!(order(&queue), vec!["a", "c2", "d"]);
}

#[test]
fn test_retain_returns_removed() {
    let id = ids(4);
    let mut queue = RenderQueue::new();
    queue.insert(id[0], "a", Bucket::Opaque);
    queue.insert(id[1], "b", Bucket::Transparent);
    queue.insert(id[2], "c", Bucket::Opaque);
    queue.insert(id[3], "d", Bucket::Transparent);

    let keep = [id[0], id[3]];
    let mut removed = queue.retain(|id| keep.contains(&id));
    removed.sort();
    assert_eq!(removed, vec!["b", "c"]);
    assert_eq!(order(&queue), vec!["a", "d"]);
    assert!(!queue.contains(id[2]));
    assert_eq!(queue.get(id[3]), Some(&"d"));
}

#[test]
fn test_iter_mut_follows_draw_order() {
    let id = ids(2);
    let mut queue = RenderQueue::new();
    queue.insert(id[0], 1, Bucket::Transparent);
    queue.insert(id[1], 2, Bucket::Opaque);

    let mut seen = Vec::new();
    for (_, bucket, item) in queue.iter_mut() {
        *item *= 10;
        seen.push(bucket);
    }
    assert_eq!(seen, vec![Bucket::Opaque, Bucket::Transparent]);
    assert_eq!(queue.get(id[0]), Some(&10));
}

#[test]
fn test_clear_empties_both_buckets() {
    let id = ids(2);
    let mut queue = RenderQueue::new();
    queue.insert(id[0], "a", Bucket::Opaque);
    queue.insert(id[1], "b", Bucket::Transparent);

    assert_eq!(queue.clear(), vec!["a", "b"]);
    assert!(queue.is_empty());
    assert!(queue.bucket_of(id[0]).is_none());
}
