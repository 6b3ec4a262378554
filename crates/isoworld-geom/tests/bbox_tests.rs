use isoworld_geom::BoundingBox;

#[test]
fn contains_is_half_open() {
    let b = BoundingBox::new(10, 20, 0, 2, 3, 4);
    assert!(b.contains(10, 20, 0));
    assert!(b.contains(11, 22, 3));
    assert!(!b.contains(12, 20, 0));
    assert!(!b.contains(10, 23, 0));
    assert!(!b.contains(10, 20, 4));
    assert!(!b.contains(9, 20, 0));
}

#[test]
fn touching_faces_do_not_intersect() {
    let a = BoundingBox::new(0, 0, 0, 2, 2, 2);
    let right = BoundingBox::new(2, 0, 0, 2, 2, 2);
    let above = BoundingBox::new(0, 0, 2, 1, 1, 1);
    assert!(!a.intersects(&right));
    assert!(!a.intersects(&above));
    assert!(a.intersects(&BoundingBox::new(1, 1, 1, 5, 5, 5)));
}

#[test]
fn tall_box_reaches_cell_above_anchor() {
    let mover = BoundingBox::new(5, 5, 0, 1, 1, 4);
    let ledge = BoundingBox::new(5, 5, 3, 1, 1, 1);
    assert!(mover.intersects(&ledge));
    assert!(!mover.at(5, 5, 4).intersects(&ledge.at(5, 5, 3)));
}

#[test]
fn max_cell_is_inclusive_corner() {
    let b = BoundingBox::new(4, 4, 1, 3, 2, 4);
    assert_eq!(b.max_cell(), (6, 5, 4));
    let (mx, my, mz) = b.max_cell();
    assert!(b.contains(mx, my, mz));
}
