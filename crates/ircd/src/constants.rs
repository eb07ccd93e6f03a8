// Numeric replies from RFC 1459 / RFC 2812 section 5, plus the protocol
// limits the server enforces. Codes are kept as `*_NB` constants and the
// fixed reply texts as `*_STR` so the formatting in replies.rs stays
// readable.

// Hard protocol limits (RFC 2812 section 2.3 and channel/key grammar).
pub const MAX_MESSAGE_LENGTH: usize = 512; // includes the terminating CRLF
pub const MAX_INPUT_BUFFER: usize = 8192;
pub const MAX_NICKNAME_LENGTH: usize = 9;
pub const MAX_CHANNEL_NAME_LENGTH: usize = 50;
pub const MAX_TOPIC_LENGTH: usize = 307;
pub const MAX_KEY_LENGTH: usize = 23;
pub const MAX_USER_LIMIT: usize = 999;

// Connection registration
pub const RPL_WELCOME_NB: u16 = 1;
pub const RPL_YOURHOST_NB: u16 = 2;
pub const RPL_CREATED_NB: u16 = 3;
pub const RPL_MYINFO_NB: u16 = 4;

// Command responses
pub const RPL_ENDOFSTATS_NB: u16 = 219;
pub const RPL_ENDOFSTATS_STR: &str = "End of STATS report";
pub const RPL_STATSUPTIME_NB: u16 = 242;
pub const RPL_ADMINME_NB: u16 = 256;
pub const RPL_ADMINME_STR: &str = "Administrative info";
pub const RPL_ADMINLOC1_NB: u16 = 257;
pub const RPL_ADMINLOC2_NB: u16 = 258;
pub const RPL_ADMINEMAIL_NB: u16 = 259;

//    311    RPL_WHOISUSER
//           "<nick> <user> <host> * :<real name>"
pub const RPL_WHOISUSER_NB: u16 = 311;
pub const RPL_WHOISSERVER_NB: u16 = 312;
pub const RPL_ENDOFWHO_NB: u16 = 315;
pub const RPL_ENDOFWHO_STR: &str = "End of /WHO list";
pub const RPL_WHOISIDLE_NB: u16 = 317;
pub const RPL_WHOISIDLE_STR: &str = "seconds idle";
pub const RPL_ENDOFWHOIS_NB: u16 = 318;
pub const RPL_ENDOFWHOIS_STR: &str = "End of /WHOIS list";
pub const RPL_WHOISCHANNELS_NB: u16 = 319;

//    321    RPL_LISTSTART
//           "Channel :Users  Name"
pub const RPL_LISTSTART_NB: u16 = 321;
pub const RPL_LISTSTART_STR: &str = "Channel :Users  Name";
pub const RPL_LIST_NB: u16 = 322;
pub const RPL_LISTEND_NB: u16 = 323;
pub const RPL_LISTEND_STR: &str = "End of /LIST";
pub const RPL_CHANNELMODEIS_NB: u16 = 324;

//    331    RPL_NOTOPIC
//           "<channel> :No topic is set"
pub const RPL_NOTOPIC_NB: u16 = 331;
pub const RPL_NOTOPIC_STR: &str = "No topic is set";
pub const RPL_TOPIC_NB: u16 = 332;
pub const RPL_INVITING_NB: u16 = 341;
pub const RPL_VERSION_NB: u16 = 351;
pub const RPL_WHOREPLY_NB: u16 = 352;

//    353    RPL_NAMREPLY
//           "= <channel> :[[@|+]<nick> [[@|+]<nick> [...]]]"
pub const RPL_NAMREPLY_NB: u16 = 353;
pub const RPL_ENDOFNAMES_NB: u16 = 366;
pub const RPL_ENDOFNAMES_STR: &str = "End of /NAMES list";
pub const RPL_INFO_NB: u16 = 371;
pub const RPL_MOTD_NB: u16 = 372;
pub const RPL_ENDOFINFO_NB: u16 = 374;
pub const RPL_ENDOFINFO_STR: &str = "End of /INFO list";
pub const RPL_MOTDSTART_NB: u16 = 375;
pub const RPL_ENDOFMOTD_NB: u16 = 376;
pub const RPL_ENDOFMOTD_STR: &str = "End of /MOTD command";
pub const RPL_TIME_NB: u16 = 391;

// Error replies
pub const ERR_NOSUCHNICK_NB: u16 = 401;
pub const ERR_NOSUCHNICK_STR: &str = "No such nick/channel";
pub const ERR_NOSUCHCHANNEL_NB: u16 = 403;
pub const ERR_NOSUCHCHANNEL_STR: &str = "No such channel";
pub const ERR_CANNOTSENDTOCHAN_NB: u16 = 404;
pub const ERR_CANNOTSENDTOCHAN_STR: &str = "Cannot send to channel";
pub const ERR_TOOMANYCHANNELS_NB: u16 = 405;
pub const ERR_TOOMANYCHANNELS_STR: &str = "You have joined too many channels";
pub const ERR_NOORIGIN_NB: u16 = 409;
pub const ERR_NOORIGIN_STR: &str = "No origin specified";
pub const ERR_NORECIPIENT_NB: u16 = 411;
pub const ERR_NOTEXTTOSEND_NB: u16 = 412;
pub const ERR_NOTEXTTOSEND_STR: &str = "No text to send";
pub const ERR_UNKNOWNCOMMAND_NB: u16 = 421;
pub const ERR_UNKNOWNCOMMAND_STR: &str = "Unknown command";
pub const ERR_NOMOTD_NB: u16 = 422;
pub const ERR_NOMOTD_STR: &str = "MOTD File is missing";
pub const ERR_NONICKNAMEGIVEN_NB: u16 = 431;
pub const ERR_NONICKNAMEGIVEN_STR: &str = "No nickname given";
pub const ERR_ERRONEUSNICKNAME_NB: u16 = 432;
pub const ERR_ERRONEUSNICKNAME_STR: &str = "Erroneous nickname";
pub const ERR_NICKNAMEINUSE_NB: u16 = 433;
pub const ERR_NICKNAMEINUSE_STR: &str = "Nickname is already in use";
pub const ERR_USERNOTINCHANNEL_NB: u16 = 441;
pub const ERR_USERNOTINCHANNEL_STR: &str = "They aren't on that channel";
pub const ERR_NOTONCHANNEL_NB: u16 = 442;
pub const ERR_NOTONCHANNEL_STR: &str = "You're not on that channel";
pub const ERR_USERONCHANNEL_NB: u16 = 443;
pub const ERR_USERONCHANNEL_STR: &str = "is already on channel";
pub const ERR_NOTREGISTERED_NB: u16 = 451;
pub const ERR_NOTREGISTERED_STR: &str = "You have not registered";
pub const ERR_NEEDMOREPARAMS_NB: u16 = 461;
pub const ERR_NEEDMOREPARAMS_STR: &str = "Not enough parameters";
pub const ERR_ALREADYREGISTRED_NB: u16 = 462;
pub const ERR_ALREADYREGISTRED_STR: &str = "You may not reregister";
pub const ERR_PASSWDMISMATCH_NB: u16 = 464;
pub const ERR_PASSWDMISMATCH_STR: &str = "Password incorrect";
pub const ERR_CHANNELISFULL_NB: u16 = 471;
pub const ERR_CHANNELISFULL_STR: &str = "Cannot join channel (+l)";
pub const ERR_UNKNOWNMODE_NB: u16 = 472;
pub const ERR_UNKNOWNMODE_STR: &str = "is unknown mode char to me";
pub const ERR_INVITEONLYCHAN_NB: u16 = 473;
pub const ERR_INVITEONLYCHAN_STR: &str = "Cannot join channel (+i)";
pub const ERR_BANNEDFROMCHAN_NB: u16 = 474;
pub const ERR_BANNEDFROMCHAN_STR: &str = "Cannot join channel (+b)";
pub const ERR_BADCHANNELKEY_NB: u16 = 475;
pub const ERR_BADCHANNELKEY_STR: &str = "Cannot join channel (+k)";
pub const ERR_CHANOPRIVSNEEDED_NB: u16 = 482;
pub const ERR_CHANOPRIVSNEEDED_STR: &str = "You're not channel operator";
pub const ERR_USERSDONTMATCH_NB: u16 = 502;
pub const ERR_USERSDONTMATCH_STR: &str = "Cannot change mode for other users";
