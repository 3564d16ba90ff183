//! Produce an Argon2 PHC string for seeding the first admin row by hand.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};

fn main() {
    let password = std::env::args()
        .nth(1)
        .expect("Usage: hashpass <password>");
    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("argon2 hashing failed")
        .to_string();
    println!("{phc}");
}
