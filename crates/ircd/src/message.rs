use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, space0, space1},
    combinator::rest,
    multi::many0,
    sequence::preceded,
};

// 2.3.1 Message format in Augmented BNF
//
//     message    =  [ ":" prefix SPACE ] command [ params ] crlf
//     command    =  1*letter / 3digit
//     params     =  *14( SPACE middle ) [ SPACE ":" trailing ]
//     middle     =  nospcrlfcl *( ":" / nospcrlfcl )
//     trailing   =  *( ":" / " " / nospcrlfcl )
//
// The framer already removed the CRLF. A parameter starting with ":" after
// at least one token swallows the remainder of the line; the verb always
// counts as that first token, so the check collapses to "any parameter
// position".

/// One tokenized inbound line: upper-cased verb plus positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub verb: String,
    pub params: Vec<String>,
}

fn middle_parser(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != ' ').parse(input)
}

//     trailing   =  *( ":" / " " / nospcrlfcl )
fn trailing_parser(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), rest).parse(input)
}

pub fn message_parser(input: &str) -> IResult<&str, Message> {
    let (rem, verb) = preceded(space0, middle_parser).parse(input)?;
    let (rem, params) = many0(preceded(
        space1,
        alt((trailing_parser, middle_parser)),
    ))
    .parse(rem)?;

    Ok((
        rem,
        Message {
            verb: verb.to_ascii_uppercase(),
            params: params.into_iter().map(str::to_owned).collect(),
        },
    ))
}

impl Message {
    pub fn parse(line: &str) -> Option<Message> {
        match message_parser(line) {
            Ok((_rem, message)) => Some(message),
            Err(_) => None,
        }
    }
}
