use formwork_derive::formwork_error;

#[formwork_error]
pub enum DemoError {
    Io(std::io::Error),
}

fn main() {}
