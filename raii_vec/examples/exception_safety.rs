use raii_vec::{Console, DynamicArray};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Tracked(usize, Arc<AtomicUsize>);

impl Drop for Tracked {
    fn drop(&mut self) {
        println!("Dropping element {}", self.0);
        self.1.fetch_add(1, Ordering::SeqCst);
    }
}

fn main() {
    println!("--- RAII & Ownership Transfer Example ---");
    let drop_count = Arc::new(AtomicUsize::new(0));

    {
        let mut a = DynamicArray::labeled("a", 1).with_narrator(Arc::new(Console));
        for i in 0..3 {
            a.push(Tracked(i, drop_count.clone()));
        }
        let mut b = DynamicArray::labeled("b", 1).with_narrator(Arc::new(Console));
        b.push(Tracked(100, drop_count.clone()));

        // b's old element is released here, exactly once
        b.assign_move(&mut a);
        println!("a now holds {} items, b holds {}", a.len(), b.len());
        // Scope ends here, b is dropped
    }

    println!("Total elements dropped: {}", drop_count.load(Ordering::SeqCst));
    assert_eq!(drop_count.load(Ordering::SeqCst), 4);
}
