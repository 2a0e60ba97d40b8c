/// Token representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub position: u32,  // 1-based offset in the analyzed term stream
}

impl Token {
    pub fn new(text: String) -> Self {
        Token { text, position: 0 }
    }
}
