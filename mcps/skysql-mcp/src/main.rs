//! SkySQL MCP Server - database management tools over stdio

use skysql_mcp::SkySqlMcpServer;

mcp_common::serve_stdio!(SkySqlMcpServer, "skysql_mcp");
