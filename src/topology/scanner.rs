use crate::error::TopologyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bracket {
    Angle,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    Open(Bracket),
    Close(Bracket),
    Word(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub offset: usize,
}

impl Token<'_> {
    pub fn text(&self) -> String {
        match self.kind {
            TokenKind::Open(Bracket::Angle) => "<".to_string(),
            TokenKind::Open(Bracket::Square) => "[".to_string(),
            TokenKind::Close(Bracket::Angle) => ">".to_string(),
            TokenKind::Close(Bracket::Square) => "]".to_string(),
            TokenKind::Word(word) => word.to_string(),
        }
    }
}

/// Splits raw bytes into brackets and whitespace-delimited words.
pub(crate) struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }
}

fn is_delimiter(byte: u8) -> bool {
    byte.is_ascii_whitespace() || matches!(byte, b'<' | b'>' | b'[' | b']')
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>, TopologyError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        let offset = self.pos;
        let byte = *self.input.get(offset)?;

        let kind = match byte {
            b'<' => TokenKind::Open(Bracket::Angle),
            b'[' => TokenKind::Open(Bracket::Square),
            b'>' => TokenKind::Close(Bracket::Angle),
            b']' => TokenKind::Close(Bracket::Square),
            _ => {
                let end = self.input[offset..]
                    .iter()
                    .position(|b| is_delimiter(*b))
                    .map(|len| offset + len)
                    .unwrap_or(self.input.len());
                self.pos = end;
                let raw = &self.input[offset..end];
                return Some(match std::str::from_utf8(raw) {
                    Ok(word) => Ok(Token {
                        kind: TokenKind::Word(word),
                        offset,
                    }),
                    Err(_) => Err(TopologyError::Unexpected {
                        offset,
                        found: String::from_utf8_lossy(raw).into_owned(),
                    }),
                });
            }
        };

        self.pos += 1;
        Some(Ok(Token { kind, offset }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind<'_>> {
        Scanner::new(input.as_bytes())
            .map(|t| t.unwrap().kind)
            .collect()
    }

    #[test]
    fn brackets_split_words_without_whitespace() {
        assert_eq!(
            kinds("<node 1 -2>[[0 1]]"),
            vec![
                TokenKind::Open(Bracket::Angle),
                TokenKind::Word("node"),
                TokenKind::Word("1"),
                TokenKind::Word("-2"),
                TokenKind::Close(Bracket::Angle),
                TokenKind::Open(Bracket::Square),
                TokenKind::Open(Bracket::Square),
                TokenKind::Word("0"),
                TokenKind::Word("1"),
                TokenKind::Close(Bracket::Square),
                TokenKind::Close(Bracket::Square),
            ]
        );
    }

    #[test]
    fn offsets_point_at_token_start() {
        let tokens: Vec<_> = Scanner::new(b"  <ab  12").map(|t| t.unwrap()).collect();
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[1].offset, 3);
        assert_eq!(tokens[2].offset, 7);
    }

    #[test]
    fn invalid_utf8_word_is_rejected() {
        let mut scanner = Scanner::new(&[b'<', 0xFF, 0xFE, b'>']);
        assert!(scanner.next().unwrap().is_ok());
        let err = scanner.next().unwrap().unwrap_err();
        assert!(matches!(err, TopologyError::Unexpected { offset: 1, .. }));
    }
}
