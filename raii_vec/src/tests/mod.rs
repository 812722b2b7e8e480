use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use crossbeam::scope;

struct Droppable(Arc<AtomicUsize>);

impl Drop for Droppable {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_construction_capacity() {
    let v: DynamicArray<i32> = DynamicArray::new();
    assert_eq!(v.capacity(), 1);
    assert!(v.is_empty());
    assert_eq!(v.last_index(), None);

    let v: DynamicArray<i32> = DynamicArray::with_capacity(0);
    assert_eq!(v.capacity(), 1);

    let v: DynamicArray<i32> = DynamicArray::with_capacity(7);
    assert_eq!(v.capacity(), 7);
    assert_eq!(v.len(), 0);
    assert_eq!(v.free_slots(), 7);

    let v: DynamicArray<i32> = DynamicArray::labeled("kelly", 0);
    assert_eq!(v.label(), "kelly");
    assert_eq!(v.capacity(), 1);
}

#[test]
fn test_try_with_capacity_overflow() {
    let v = DynamicArray::<u64>::try_with_capacity(usize::MAX);
    assert_eq!(v.err(), Some(AllocError));
}

#[test]
#[should_panic(expected = "Capacity overflow")]
fn test_with_capacity_overflow_panics() {
    let _ = DynamicArray::<u64>::with_capacity(usize::MAX);
}

#[test]
#[should_panic(expected = "Zero-sized types are not supported")]
fn test_zero_sized_rejected() {
    let _ = DynamicArray::<()>::new();
}

#[test]
fn test_push_growth_sequence() {
    let mut v = DynamicArray::labeled("nigel", 0);
    v.push(3);
    assert_eq!(v.capacity(), 1);
    assert!(v.is_full());
    v.push(56);
    assert_eq!(v.len(), 2);
    assert_eq!(v.capacity(), 3);
    assert_eq!(&v[..], &[3, 56]);
    assert_eq!(v.last_index(), Some(1));

    v.push(1);
    v.push(2);
    assert_eq!(v.capacity(), 7);
    assert_eq!(&v[..], &[3, 56, 1, 2]);
}

#[test]
fn test_basic_push_pop() {
    let mut v = DynamicArray::new();
    v.push(1);
    v.push(2);
    v.push(3);
    assert_eq!(v.len(), 3);
    assert_eq!(v[0], 1);
    assert_eq!(v[1], 2);
    assert_eq!(v[2], 3);
    assert_eq!(v.pop(), Some(3));
    assert_eq!(v.pop(), Some(2));
    assert_eq!(v.pop(), Some(1));
    assert_eq!(v.pop(), None);
}

#[test]
fn test_resize_grow_then_overflow() {
    let mut v = DynamicArray::labeled("kelly", 1);
    v.resize(5).unwrap();
    assert_eq!(v.capacity(), 5);
    for i in 1..=6 {
        v.push(i);
    }
    assert_eq!(v.capacity(), 11);
    assert_eq!(&v[..], &[1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_resize_shrink_truncates() {
    let mut v: DynamicArray<i32> = (1..=6).collect();
    v.resize(4).unwrap();
    assert_eq!(v.capacity(), 4);
    assert_eq!(&v[..], &[1, 2, 3, 4]);
    assert!(v.is_full());

    v.resize(0).unwrap();
    assert_eq!(v.capacity(), 1);
    assert_eq!(&v[..], &[1]);
}

#[test]
fn test_resize_same_capacity_keeps_contents() {
    let mut v: DynamicArray<i32> = (0..5).collect();
    let cap = v.capacity();
    v.resize(cap).unwrap();
    assert_eq!(v.capacity(), cap);
    assert_eq!(&v[..], &[0, 1, 2, 3, 4]);
}

#[test]
fn test_resize_failure_leaves_state() {
    let mut v: DynamicArray<u64> = (0..3).collect();
    let cap = v.capacity();
    assert_eq!(v.resize(usize::MAX), Err(AllocError));
    assert_eq!(v.capacity(), cap);
    assert_eq!(&v[..], &[0, 1, 2]);
}

#[test]
fn test_resize_drops_truncated_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let mut v = DynamicArray::with_capacity(4);
        for _ in 0..4 {
            v.push(Droppable(counter.clone()));
        }
        v.resize(1).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(v.len(), 1);
    }
    assert_eq!(counter.load(Ordering::SeqCst), 4);
}

#[test]
fn test_clone_is_independent() {
    let mut n = DynamicArray::labeled("nigel", 0);
    n.push(3);
    n.push(56);

    let mut m = n.clone();
    assert_eq!(m.label(), "copy");
    assert_eq!(m.capacity(), 2);
    assert_eq!(m, n);

    m.rename("mary");
    m.push(9);
    m.push(7);
    assert_eq!(&n[..], &[3, 56]);
    assert_eq!(&m[..], &[3, 56, 9, 7]);

    n.push(1);
    assert_eq!(&m[..], &[3, 56, 9, 7]);
    assert_ne!(n.as_ptr(), m.as_ptr());
}

#[test]
fn test_clone_of_empty_has_one_slot() {
    let v: DynamicArray<i32> = DynamicArray::with_capacity(8);
    let c = v.clone();
    assert_eq!(c.capacity(), 1);
    assert!(c.is_empty());
}

#[test]
fn test_take_leaves_source_empty() {
    let mut a: DynamicArray<i32> = (1..=3).collect();
    let ptr = a.as_ptr();
    let b = a.take();
    assert_eq!(&b[..], &[1, 2, 3]);
    assert_eq!(b.as_ptr(), ptr);
    assert_eq!(a.len(), 0);
    assert_eq!(a.capacity(), 0);

    // 移出后的数组依然可用
    a.push(10);
    assert_eq!(a.capacity(), 1);
    assert_eq!(&a[..], &[10]);
}

#[test]
fn test_assign_copy() {
    let src: DynamicArray<i32> = (1..=4).collect();
    let mut dst = DynamicArray::labeled("mary", 10);
    dst.push(99);
    dst.assign_copy(&src);
    assert_eq!(dst, src);
    assert_eq!(dst.label(), "mary");
    assert_eq!(dst.capacity(), 4);

    dst.push(5);
    assert_eq!(src.len(), 4);
}

#[test]
fn test_clone_from_goes_through_assign() {
    let src: DynamicArray<i32> = (0..3).collect();
    let mut dst = DynamicArray::new();
    dst.clone_from(&src);
    assert_eq!(&dst[..], &[0, 1, 2]);
}

#[test]
fn test_assign_move() {
    let mut src: DynamicArray<i32> = (1..=4).collect();
    let ptr = src.as_ptr();
    let mut dst = DynamicArray::labeled("pelle", 1);
    dst.assign_move(&mut src);
    assert_eq!(&dst[..], &[1, 2, 3, 4]);
    assert_eq!(dst.as_ptr(), ptr);
    assert!(src.is_empty());
    assert_eq!(src.capacity(), 0);
}

#[test]
fn test_self_assignment_snapshot() {
    let mut a: DynamicArray<i32> = (0..5).collect();
    let snapshot = a.clone();
    a.assign_copy(&snapshot);
    assert_eq!(&a[..], &[0, 1, 2, 3, 4]);

    let same = a.take();
    a.assign(same);
    assert_eq!(&a[..], &[0, 1, 2, 3, 4]);
}

#[test]
fn test_assign_releases_previous_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut a = DynamicArray::new();
    for _ in 0..3 {
        a.push(Droppable(counter.clone()));
    }
    let mut b = DynamicArray::new();
    b.push(Droppable(counter.clone()));

    a.assign_move(&mut b);
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    drop(b);
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    drop(a);
    assert_eq!(counter.load(Ordering::SeqCst), 4);
}

#[test]
fn test_swap_exchanges_buffers_not_labels() {
    let mut a = DynamicArray::labeled("a", 2);
    a.push(1);
    let mut b = DynamicArray::labeled("b", 5);
    b.push(2);
    b.push(3);

    swap(&mut a, &mut b);
    assert_eq!(&a[..], &[2, 3]);
    assert_eq!(a.capacity(), 5);
    assert_eq!(&b[..], &[1]);
    assert_eq!(b.capacity(), 2);
    assert_eq!(a.label(), "a");
    assert_eq!(b.label(), "b");
}

#[test]
fn test_elementwise_add() {
    let n: DynamicArray<i32> = vec![3, 56, 1, 2].into();
    let m: DynamicArray<i32> = vec![3, 56, 9, 7].into();
    let o = n.elementwise_add(&m);
    assert_eq!(&o[..], &[6, 112, 10, 9]);
    assert_eq!(o.label(), "sum");
    assert_eq!(o.capacity(), 4);

    let p = &n + &o;
    assert_eq!(&p[..], &[9, 168, 11, 11]);
    assert_eq!(&n[..], &[3, 56, 1, 2]);
}

#[test]
fn test_elementwise_add_mismatch_is_empty() {
    let a: DynamicArray<i32> = vec![1, 2].into();
    let b: DynamicArray<i32> = vec![1, 2, 3].into();
    let empty: DynamicArray<i32> = DynamicArray::new();

    assert!(a.elementwise_add(&b).is_empty());
    assert!(a.elementwise_add(&empty).is_empty());
    assert!(empty.elementwise_add(&empty).is_empty());
    assert_eq!(a.checked_add(&b), Err(ShapeError { left: 2, right: 3 }));
}

#[test]
fn test_push_error_hands_back_value() {
    let err = PushError::new(String::from("lost"), AllocError);
    assert_eq!(err.to_string(), "push failed: array is full and could not grow");
    assert_eq!(err.into_inner(), "lost");
}

#[test]
fn test_display() {
    let mut n = DynamicArray::labeled("nigel", 0);
    n.push(3);
    n.push(56);
    assert_eq!(n.to_string(), "nigel Size:3 has 2 items: 3, 56 (1 slots left)");

    n.push(7);
    assert_eq!(n.to_string(), "nigel Size:3 has 3 items: 3, 56, 7 (full)");

    let taken = n.take();
    assert_eq!(n.to_string(), "nigel Size:0 empty");
    drop(taken);

    let u: DynamicArray<i32> = DynamicArray::new();
    assert_eq!(u.to_string(), "Unnamed array Size:1 has 0 items: (1 slots left)");
}

#[test]
fn test_narration() {
    let recorder = Recorder::new();
    {
        let mut n = DynamicArray::labeled("nigel", 0).with_narrator(recorder.clone());
        n.push(3);
        n.push(56);
        n.rename("nina");
        let _ = n.resize(usize::MAX);
        let empty = DynamicArray::new();
        let _ = n.elementwise_add(&empty);
    }
    let lines = recorder.lines();
    assert_eq!(lines[0], "nigel: constructed with capacity 1");
    assert_eq!(lines[1], "nigel: grew on push from 1 to 3");
    assert_eq!(lines[2], "nina: renamed nigel to nina");
    assert_eq!(lines[3], format!("nina: resize to {} failed", usize::MAX));
    assert!(lines[4].starts_with("nina: cannot add arrays"));
    assert_eq!(lines.last().map(String::as_str), Some("nina: dropped 2 items, released capacity 3"));
    assert_eq!(recorder.count(|e| matches!(e, Event::Dropped { .. })), 1);
}

#[test]
fn test_raii_drop() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let mut v = DynamicArray::new();
        for _ in 0..10 {
            v.push(Droppable(counter.clone()));
        }
    }
    assert_eq!(counter.load(Ordering::SeqCst), 10);
}

#[test]
fn test_clone_drops_each_once() {
    let counter = Arc::new(AtomicUsize::new(0));

    #[derive(Clone)]
    struct Tracked(Arc<AtomicUsize>);
    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    {
        let mut v = DynamicArray::new();
        for _ in 0..4 {
            v.push(Tracked(counter.clone()));
        }
        let c = v.clone();
        assert_eq!(c.len(), 4);
    }
    assert_eq!(counter.load(Ordering::SeqCst), 8);
}

#[test]
fn test_iterators() {
    let mut v = DynamicArray::new();
    v.push(10);
    v.push(20);
    v.push(30);

    let mut sum = 0;
    for &x in &v {
        sum += x;
    }
    assert_eq!(sum, 60);

    for x in &mut v {
        *x += 1;
    }
    assert_eq!(v[0], 11);

    let collected: Vec<i32> = v.into_iter().collect();
    assert_eq!(collected, vec![11, 21, 31]);
}

#[test]
fn test_partial_into_iter_drops_rest() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut v = DynamicArray::new();
    for _ in 0..5 {
        v.push(Droppable(counter.clone()));
    }
    let mut it = v.into_iter();
    assert_eq!(it.len(), 5);
    drop(it.next());
    drop(it.next());
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    drop(it);
    assert_eq!(counter.load(Ordering::SeqCst), 5);
}

#[test]
fn test_concurrency() {
    let mut v = DynamicArray::new();
    for i in 0..100 {
        v.push(i);
    }

    scope(|s| {
        s.spawn(|_| {
            for x in &v {
                let _ = *x;
            }
        });
        s.spawn(|_| {
            for x in &v {
                let _ = *x;
            }
        });
    }).unwrap();
}
