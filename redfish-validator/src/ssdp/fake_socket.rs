use std::io::{self, BufRead, Cursor, Read};

/// Presents one already received datagram as a readable stream so that
/// stream based response parsing can run over it. No network I/O happens here.
#[derive(Debug)]
pub struct FakeDatagramSocket {
    datagram: Cursor<Vec<u8>>,
}

impl FakeDatagramSocket {
    pub fn new<B: Into<Vec<u8>>>(datagram: B) -> Self {
        Self {
            datagram: Cursor::new(datagram.into()),
        }
    }

    pub fn make_file(&mut self) -> &mut Self {
        self
    }
}

impl Read for FakeDatagramSocket {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.datagram.read(buf)
    }
}

impl BufRead for FakeDatagramSocket {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.datagram.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.datagram.consume(amt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_file_returns_the_socket_itself() {
        let mut socket = FakeDatagramSocket::new(&b"foo"[..]);
        let file: *const FakeDatagramSocket = socket.make_file();

        assert!(std::ptr::eq(file, &socket));
    }

    #[test]
    fn reads_drain_the_datagram() {
        let mut socket = FakeDatagramSocket::new(&b"HTTP/1.1 200 OK\r\n"[..]);
        let mut line = String::new();

        socket.read_line(&mut line).unwrap();
        assert_eq!(line, "HTTP/1.1 200 OK\r\n");

        let mut rest = Vec::new();
        assert_eq!(socket.read_to_end(&mut rest).unwrap(), 0);
    }
}
