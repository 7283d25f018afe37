use std::io;
use std::net::SocketAddr;

/// TCP MD5 signature option (RFC 2385), Linux only.  Applied to the
/// listening socket (keyed per peer address) and to outgoing sockets
/// before connect.
#[cfg(target_os = "linux")]
pub fn set_md5_sig(fd: std::os::unix::io::RawFd, addr: &SocketAddr, password: &str) -> io::Result<()> {
    const TCP_MD5SIG_MAXKEYLEN: usize = 80;

    #[repr(C)]
    struct TcpMd5Sig {
        addr: libc::sockaddr_storage,
        flags: u8,
        prefixlen: u8,
        keylen: u16,
        pad: u32,
        key: [u8; TCP_MD5SIG_MAXKEYLEN],
    }

    if password.len() > TCP_MD5SIG_MAXKEYLEN {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "md5 key too long"));
    }

    // SAFETY: zeroed sockaddr_storage is a valid representation; the
    // union is filled per address family below.
    let mut sig: TcpMd5Sig = unsafe { std::mem::zeroed() };
    match addr {
        SocketAddr::V4(v4) => {
            let sin = &mut sig.addr as *mut _ as *mut libc::sockaddr_in;
            // SAFETY: sockaddr_in fits inside sockaddr_storage.
            unsafe {
                (*sin).sin_family = libc::AF_INET as libc::sa_family_t;
                (*sin).sin_port = v4.port().to_be();
                (*sin).sin_addr.s_addr = u32::from_ne_bytes(v4.ip().octets());
            }
        }
        SocketAddr::V6(v6) => {
            let sin6 = &mut sig.addr as *mut _ as *mut libc::sockaddr_in6;
            // SAFETY: sockaddr_in6 fits inside sockaddr_storage.
            unsafe {
                (*sin6).sin6_family = libc::AF_INET6 as libc::sa_family_t;
                (*sin6).sin6_port = v6.port().to_be();
                (*sin6).sin6_addr.s6_addr = v6.ip().octets();
            }
        }
    }
    sig.keylen = password.len() as u16;
    sig.key[..password.len()].copy_from_slice(password.as_bytes());

    // SAFETY: fd is a live TCP socket; sig is fully initialised.
    let rc = unsafe {
        libc::setsockopt(
            fd,
            libc::IPPROTO_TCP,
            libc::TCP_MD5SIG,
            &sig as *const _ as *const libc::c_void,
            std::mem::size_of::<TcpMd5Sig>() as libc::socklen_t,
        )
    };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn set_md5_sig(_fd: i32, _addr: &SocketAddr, _password: &str) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "TCP MD5 signatures are only supported on Linux",
    ))
}
