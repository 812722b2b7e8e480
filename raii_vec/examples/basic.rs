use raii_vec::DynamicArray;

fn main() {
    println!("--- Basic Usage Example ---");
    let mut arr = DynamicArray::labeled("basic", 1);

    // Push elements
    for i in 1..=5 {
        arr.push(i * 10);
        println!("Pushed: {}, len: {}, cap: {}", i * 10, arr.len(), arr.capacity());
    }

    println!("{arr}");

    // Shrink below the item count
    if let Err(e) = arr.resize(3) {
        eprintln!("resize failed: {e}");
    }
    println!("After resize(3): {arr}");

    while let Some(val) = arr.pop() {
        println!("Popped: {}, len: {}", val, arr.len());
    }
}
