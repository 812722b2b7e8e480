use raii_vec::DynamicArray;
use std::thread;

fn main() {
    println!("--- Cross-thread Ownership Transfer Example ---");
    let mut arr = DynamicArray::labeled("shipped", 1);
    for i in 0..10 {
        arr.push(i);
    }

    println!("Original array (thread main): {arr}");

    // Move ownership to another thread
    let handle = thread::spawn(move || {
        println!("Array in new thread: {:?}", &arr[..]);
        arr.push(100);
        arr // Return ownership back
    });

    match handle.join() {
        Ok(arr) => println!("Array back in main thread: {arr}"),
        Err(_) => eprintln!("worker thread panicked"),
    }
}
