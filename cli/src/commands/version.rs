const MAJOR: &str = "0";
const MINOR: &str = "1";
const FIX: &str = "0";
const VERBAL: &str = "Account Model & Proof of Work";

pub fn run() {
    println!("obscura {MAJOR}.{MINOR}.{FIX} ({VERBAL})");
}
