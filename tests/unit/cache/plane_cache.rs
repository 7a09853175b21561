use super::*;

fn image() -> Arc<PlaneImage> {
    Arc::new(PlaneImage::new_grey(4, 4))
}

fn cache(entries: usize) -> XyCache {
    // image size 16 bytes, capacity `entries`
    XyCache::new(entries * 16, 16, NavigationHistory::new()).unwrap()
}

fn p(z: u32, t: u32) -> PlanePoint {
    PlanePoint::new(z, t)
}

#[test]
fn zero_image_size_is_a_configuration_error() {
    assert!(XyCache::new(1024, 0, NavigationHistory::new()).is_err());
}

#[test]
fn capacity_is_floor_of_the_ratio() {
    let c = XyCache::new(100, 16, NavigationHistory::new()).unwrap();
    assert_eq!(c.max_entries(), 6);
}

#[test]
fn capacity_invariant_holds_under_many_adds() {
    let mut c = cache(3);
    for i in 0..50 {
        c.add(p(i % 7, i / 7), image());
        assert!(c.len() <= 3);
    }
}

#[test]
fn oversized_image_makes_the_cache_a_no_op() {
    let mut c = XyCache::new(10, 16, NavigationHistory::new()).unwrap();
    assert_eq!(c.max_entries(), 0);
    c.add(p(0, 0), image());
    assert!(c.is_empty());
    assert_eq!(c.extract(p(0, 0)), None);
}

#[test]
fn extract_returns_what_was_added() {
    let mut c = cache(3);
    let img = image();
    c.add(p(1, 2), Arc::clone(&img));
    assert!(c.contains(p(1, 2)));
    assert!(Arc::ptr_eq(&c.extract(p(1, 2)).unwrap(), &img));
    assert_eq!(c.extract(p(9, 9)), None);
}

#[test]
fn replacing_a_key_does_not_evict() {
    let mut c = cache(2);
    c.add(p(0, 0), image());
    c.add(p(0, 1), image());
    c.add(p(0, 0), image());
    assert_eq!(c.len(), 2);
    assert!(c.contains(p(0, 0)));
    assert!(c.contains(p(0, 1)));
}

#[test]
fn without_direction_the_farthest_plane_is_evicted() {
    // inserts alone never navigate, so the history has no direction and the
    // farthest plane from the incoming key goes
    let mut c = cache(3);
    c.add(p(0, 0), image());
    c.add(p(0, 1), image());
    c.add(p(0, 2), image());
    c.add(p(0, 5), image());

    assert!(!c.contains(p(0, 0)));
    assert!(c.contains(p(0, 1)));
    assert!(c.contains(p(0, 2)));
    assert!(c.contains(p(0, 5)));
}

#[test]
fn eviction_prefers_planes_already_passed() {
    // the user walked (0,0) -> (0,1); the cache also holds (0,2) ahead.
    // Inserting (0,5) with direction +t evicts the farthest plane behind
    // the walk, (0,0), not the ahead plane (0,2).
    let mut c = cache(3);
    c.extract(p(0, 0));
    c.add(p(0, 0), image());
    c.extract(p(0, 1));
    c.add(p(0, 1), image());
    c.add(p(0, 2), image());
    c.add(p(0, 5), image());

    assert!(!c.contains(p(0, 0)));
    assert!(c.contains(p(0, 1)));
    assert!(c.contains(p(0, 2)));
    assert!(c.contains(p(0, 5)));
}

#[test]
fn off_line_planes_are_evicted_before_on_line_ones() {
    // (5,1) sits off the z=0 travel line; it goes first even though (0,0)
    // is farther from the incoming key
    let mut c = cache(3);
    c.add(p(5, 1), image());
    c.add(p(0, 0), image());
    c.add(p(0, 1), image());
    c.extract(p(0, 0));
    c.extract(p(0, 1));
    c.add(p(0, 2), image());

    assert!(!c.contains(p(5, 1)));
    assert!(c.contains(p(0, 0)));
    assert!(c.contains(p(0, 1)));
    assert!(c.contains(p(0, 2)));
}

#[test]
fn clear_empties_the_cache() {
    let mut c = cache(3);
    c.add(p(0, 0), image());
    c.add(p(0, 1), image());
    c.clear();
    assert!(c.is_empty());
    assert!(!c.contains(p(0, 0)));
}

#[test]
fn reset_capacity_recomputes_and_clears() {
    let mut c = cache(3);
    c.add(p(0, 0), image());
    c.reset_capacity(5 * 16);
    assert_eq!(c.max_entries(), 5);
    assert!(c.is_empty());

    c.reset_capacity(0);
    assert_eq!(c.max_entries(), 0);
    c.add(p(0, 0), image());
    assert!(c.is_empty());
}
